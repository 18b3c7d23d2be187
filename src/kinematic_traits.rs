extern crate nalgebra as na;

use na::{Matrix4, Matrix6xX, Vector3};

use crate::expression::Expr;
use crate::kinematics_error::KinematicsError;

/// Pose is a 4x4 homogeneous transform with symbolic entries. The rotation occupies
/// the upper left 3x3 block, the translation the first three rows of the last column.
/// ```
/// extern crate nalgebra as na;
/// use dh_symbolic_kinematics::expression::Expr;
/// use dh_symbolic_kinematics::kinematic_traits::Pose;
///
/// let mut pose = Pose::identity();
/// pose[(0, 3)] = Expr::symbol("x");
/// assert_eq!(pose[(3, 3)], Expr::from(1.0));
/// ```
pub type Pose = Matrix4<Expr>;

/// Geometric Jacobian, 6 rows (3 linear, then 3 angular) and one column per joint.
pub type SymbolicJacobian = Matrix6xX<Expr>;

/// Joint values for evaluation, one per link, symbolic or numeric.
pub type Joints = [Expr];

pub trait SymbolicKinematics {
    /// Computes the end-effector pose. When `joints` is None, the kinematics uses its own
    /// symbolic joint variables. Implementations recompute [`SymbolicKinematics::frames`]
    /// as a side effect.
    fn forward(&mut self, joints: Option<&Joints>) -> Result<Pose, KinematicsError>;

    /// Cumulative transforms of every link frame in the base frame, as computed
    /// by the last call of [`SymbolicKinematics::forward`].
    fn frames(&self) -> &[Pose];

    /// Number of joints.
    fn dof(&self) -> usize;
}

/// Translation part of the pose.
pub fn translation(pose: &Pose) -> Vector3<Expr> {
    Vector3::new(pose[(0, 3)].clone(), pose[(1, 3)].clone(), pose[(2, 3)].clone())
}

/// Z axis of the frame in the coordinates of the reference frame (third rotation column).
pub fn z_axis(pose: &Pose) -> Vector3<Expr> {
    Vector3::new(pose[(0, 2)].clone(), pose[(1, 2)].clone(), pose[(2, 2)].clone())
}
