//! Symbolic forward kinematics and geometric Jacobian for serial manipulators described by
//! Denavit-Hartenberg parameters.
//!
//! Rather than numbers, this library produces closed-form expressions: the pose of the tool
//! center point and its Jacobian are `nalgebra` matrices whose entries are symbolic expressions
//! in the joint variables (and in any DH parameter given as a symbol). These expressions can be
//! differentiated, simplified, printed or evaluated numerically later.
//!
//! # Features
//!
//! - Per-link homogeneous transforms from the standard DH parameters `a`, `d`, `alpha`, `theta`,
//!   each either a number or a symbol.
//! - Composition of the chain into cumulative link frames and the tool center point pose.
//! - Geometric Jacobian (linear and angular part) of revolute chains, derived from the frames.
//! - Floating point noise such as `cos(pi/2) = 6.123233995736766e-17` is rounded away
//!   (8 decimal digits), so numeric parameters mixed with symbolic joints stay readable.
//! - Small self-contained symbolic engine with differentiation and a polynomial normal form
//!   that recognizes `sin^2 + cos^2 = 1`, enough to verify kinematic identities symbolically.
//! - DH tables for a few robots, and reading DH tables from YAML (feature `allow_filesystem`).
//!
//! # Example
//!
//! ```
//! use dh_symbolic_kinematics::kinematic_chain::KinematicChain;
//!
//! let mut chain = KinematicChain::new();
//! chain.add_link(0.5, 0.0, 0.0, 0.0, None);
//! chain.add_link(0.3, 0.0, 0.0, 0.0, None);
//!
//! let pose = chain.evaluate(None).unwrap();
//! let jacobian = chain.jacobian(None).unwrap();
//!
//! // Differentiating the position reproduces the linear part of the Jacobian
//! let q0 = &chain.joint_variables()[0];
//! let dx = pose[(0, 3)].diff_by(q0).unwrap();
//! assert!(dx.approx_eq(&jacobian[(0, 0)], 1e-9));
//! ```

pub mod kinematics_error;

pub mod expression;
mod simplify;

pub mod kinematic_traits;
pub mod dh_link;
pub mod kinematic_chain;
pub mod jacobian;

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;
#[cfg(feature = "allow_filesystem")]
pub mod parameter_error;

#[path = "utils/utils.rs"]
pub mod utils;

#[cfg(test)]
mod tests;
