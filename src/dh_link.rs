//! Homogeneous transform of a single Denavit-Hartenberg link

use num_traits::{One, Zero};

use crate::expression::{Expr, ROUNDING_DIGITS};
use crate::kinematic_traits::Pose;

/// One link of a serial chain, given by standard DH parameters. The joint rotates about
/// the z axis of the previous frame, so the joint value adds to `theta`.
#[derive(Debug, Clone)]
pub struct DhLink {
    /// Link length, along the common normal (x)
    a: Expr,

    /// Link offset, along the previous z
    d: Expr,

    /// Twist angle about the common normal
    alpha: Expr,

    /// Joint angle offset about the previous z
    theta: Expr,

    cos_alpha: Expr,
    sin_alpha: Expr,
}

impl DhLink {
    /// Creates the link. Parameters may be numbers or symbolic expressions.
    pub fn new(
        a: impl Into<Expr>,
        d: impl Into<Expr>,
        alpha: impl Into<Expr>,
        theta: impl Into<Expr>,
    ) -> Self {
        let alpha = alpha.into();
        let cos_alpha = alpha.cos();
        let sin_alpha = alpha.sin();
        DhLink { a: a.into(), d: d.into(), alpha, theta: theta.into(), cos_alpha, sin_alpha }
    }

    pub fn a(&self) -> &Expr {
        &self.a
    }

    pub fn d(&self) -> &Expr {
        &self.d
    }

    pub fn alpha(&self) -> &Expr {
        &self.alpha
    }

    pub fn theta(&self) -> &Expr {
        &self.theta
    }

    /// Transform of this link for the joint value `q`, with all floating point literals
    /// rounded to 8 decimal digits (so that `cos(pi/2)` becomes an exact zero).
    pub fn evaluate(&self, q: &Expr) -> Pose {
        dh_transform(q, &self.a, &self.d, &self.cos_alpha, &self.sin_alpha, &self.theta)
            .map(|e| e.round_floats(ROUNDING_DIGITS))
    }
}

/// DH transform of a link without constructing [`DhLink`]. No rounding is applied.
pub fn dh_matrix(q: &Expr, a: &Expr, d: &Expr, alpha: &Expr, theta: &Expr) -> Pose {
    dh_transform(q, a, d, &alpha.cos(), &alpha.sin(), theta)
}

fn dh_transform(q: &Expr, a: &Expr, d: &Expr, cos_alpha: &Expr, sin_alpha: &Expr, theta: &Expr) -> Pose {
    let angle = theta.clone() + q.clone();
    let c = angle.cos();
    let s = angle.sin();

    Pose::new(
        c.clone(),
        -(s.clone() * cos_alpha.clone()),
        s.clone() * sin_alpha.clone(),
        a.clone() * c.clone(),
        //
        s.clone(),
        c.clone() * cos_alpha.clone(),
        -(c.clone() * sin_alpha.clone()),
        a.clone() * s,
        //
        Expr::zero(),
        sin_alpha.clone(),
        cos_alpha.clone(),
        d.clone(),
        //
        Expr::zero(),
        Expr::zero(),
        Expr::zero(),
        Expr::one(),
    )
}
