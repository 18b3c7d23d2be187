//! Serial chain of DH links with symbolic forward kinematics

use num_traits::Zero;
use tracing::{debug, trace};

use crate::dh_link::DhLink;
use crate::expression::{Expr, ROUNDING_DIGITS};
use crate::jacobian::compute_jacobian;
use crate::kinematic_traits::{Joints, Pose, SymbolicJacobian, SymbolicKinematics};
use crate::kinematics_error::KinematicsError;
use crate::parameters::dh_kinematics::Parameters;

/// Ordered DH links (index 0 next to the base), one joint variable per link, the
/// cumulative transforms of the last evaluation and the tool center point offset.
#[derive(Debug, Clone)]
pub struct KinematicChain {
    links: Vec<DhLink>,
    joints: Vec<Expr>,

    /// `cumulative[i]` is the pose of the frame of link i in the base frame.
    /// Zero matrices until the chain is evaluated for the first time.
    cumulative: Vec<Pose>,

    tcp_offset: Pose,
}

impl Default for KinematicChain {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicChain {
    /// Creates an empty chain with identity TCP offset.
    pub fn new() -> Self {
        KinematicChain {
            links: Vec::new(),
            joints: Vec::new(),
            cumulative: Vec::new(),
            tcp_offset: Pose::identity(),
        }
    }

    /// Appends a link with the given DH parameters. The joint variable is `joint`
    /// if given, otherwise a new symbol `q[i]` where `i` is the index of the link.
    /// ```
    /// use dh_symbolic_kinematics::kinematic_chain::KinematicChain;
    /// use dh_symbolic_kinematics::expression::Expr;
    ///
    /// let mut chain = KinematicChain::new();
    /// chain.add_link(0.5, 0.0, 0.0, 0.0, None);
    /// chain.add_link(0.3, 0.0, 0.0, 0.0, Some(Expr::symbol("elbow")));
    /// assert_eq!(chain.joint_variables()[0], Expr::symbol("q[0]"));
    /// assert_eq!(chain.joint_variables()[1], Expr::symbol("elbow"));
    /// ```
    pub fn add_link(
        &mut self,
        a: impl Into<Expr>,
        d: impl Into<Expr>,
        alpha: impl Into<Expr>,
        theta: impl Into<Expr>,
        joint: Option<Expr>,
    ) {
        self.push_link(DhLink::new(a, d, alpha, theta), joint);
    }

    /// Builds the chain from a DH table, links in table order.
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let mut chain = KinematicChain::new();
        for link in &parameters.links {
            chain.add_link(&link.a, &link.d, &link.alpha, &link.theta, link.joint.clone());
        }
        let [x, y, z] = &parameters.tcp_offset;
        chain.set_tcp_offset(x, y, z);
        chain
    }

    /// Appends an already constructed link, see [`KinematicChain::add_link`].
    pub fn push_link(&mut self, link: DhLink, joint: Option<Expr>) {
        let joint = joint.unwrap_or_else(|| Expr::symbol(format!("q[{}]", self.joints.len())));
        self.links.push(link);
        self.joints.push(joint);
        self.cumulative.push(Pose::zeros());
    }

    /// Sets the translation of the tool center point relative to the last link frame.
    /// The rotation stays identity.
    pub fn set_tcp_offset(&mut self, x: impl Into<Expr>, y: impl Into<Expr>, z: impl Into<Expr>) {
        self.tcp_offset[(0, 3)] = x.into();
        self.tcp_offset[(1, 3)] = y.into();
        self.tcp_offset[(2, 3)] = z.into();
    }

    pub fn tcp_offset(&self) -> &Pose {
        &self.tcp_offset
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn links(&self) -> &[DhLink] {
        &self.links
    }

    /// Symbolic joint variables, used when evaluating without explicit joint values.
    pub fn joint_variables(&self) -> &[Expr] {
        &self.joints
    }

    pub fn cumulative_transforms(&self) -> &[Pose] {
        &self.cumulative
    }

    /// Computes the pose of the tool center point. Without `joints`, the chain's own joint
    /// variables are used and the pose is fully symbolic; otherwise the given values replace
    /// them positionally. All cumulative transforms are recomputed. Floating point literals
    /// in the rotation and translation rows are rounded to 8 decimal digits.
    pub fn evaluate(&mut self, joints: Option<&Joints>) -> Result<Pose, KinematicsError> {
        if self.links.is_empty() {
            return Err(KinematicsError::EmptyChain);
        }
        let joints = match joints {
            Some(values) if values.len() != self.links.len() => {
                return Err(KinematicsError::JointCountMismatch {
                    expected: self.links.len(),
                    found: values.len(),
                });
            }
            Some(values) => values,
            None => self.joints.as_slice(),
        };
        debug!(links = self.links.len(), "evaluating kinematic chain");

        let mut cumulative: Vec<Pose> = Vec::with_capacity(self.links.len());
        for (i, (link, q)) in self.links.iter().zip(joints).enumerate() {
            let transform = link.evaluate(q);
            let frame = match cumulative.last() {
                Some(previous) => previous * transform,
                None => transform,
            };
            trace!(link = i, joint = %q, "frame composed");
            cumulative.push(frame);
        }

        let last = cumulative.last().ok_or(KinematicsError::EmptyChain)?;
        let mut pose = last * &self.tcp_offset;
        for row in 0..3 {
            for col in 0..4 {
                pose[(row, col)] = pose[(row, col)].round_floats(ROUNDING_DIGITS);
            }
        }
        self.cumulative = cumulative;
        Ok(pose)
    }

    /// Geometric Jacobian at the given joint values (or the symbolic joint variables).
    /// Evaluates the chain first, see [`compute_jacobian`].
    pub fn jacobian(&mut self, joints: Option<&Joints>) -> Result<SymbolicJacobian, KinematicsError> {
        compute_jacobian(self, joints)
    }

    /// True if the TCP offset is not the identity.
    pub fn has_tcp_offset(&self) -> bool {
        (0..3).any(|row| !self.tcp_offset[(row, 3)].is_zero())
    }
}

impl SymbolicKinematics for KinematicChain {
    fn forward(&mut self, joints: Option<&Joints>) -> Result<Pose, KinematicsError> {
        self.evaluate(joints)
    }

    fn frames(&self) -> &[Pose] {
        &self.cumulative
    }

    fn dof(&self) -> usize {
        self.links.len()
    }
}
