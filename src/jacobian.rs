extern crate nalgebra as na;

use na::{DMatrix, Matrix3xX, Vector3};
use num_traits::{One, Zero};
use tracing::debug;

use crate::expression::{Bindings, Expr, ROUNDING_DIGITS};
use crate::kinematic_traits::{translation, z_axis, Joints, SymbolicJacobian, SymbolicKinematics};
use crate::kinematics_error::KinematicsError;
use crate::utils::evaluate_matrix;

/// Struct representing the symbolic geometric Jacobian
pub struct Jacobian {
    /// A 6xN matrix representing the Jacobian
    ///
    /// The Jacobian matrix maps the joint velocities to the end-effector velocities.
    /// Each column corresponds to a joint, rows 0..3 are the linear and rows 3..6 the
    /// angular velocity of the end-effector.
    matrix: SymbolicJacobian,
}

impl Jacobian {
    /// Constructs a new Jacobian struct by deriving the Jacobian for the given robot
    ///
    /// # Arguments
    ///
    /// * `robot` - The robot implementing the SymbolicKinematics trait. It is evaluated
    ///             (its frames are recomputed) as part of the derivation.
    /// * `joints` - Joint values, or None to use the robot's own joint variables
    pub fn new(robot: &mut impl SymbolicKinematics, joints: Option<&Joints>) -> Result<Self, KinematicsError> {
        let matrix = compute_jacobian(robot, joints)?;
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &SymbolicJacobian {
        &self.matrix
    }

    /// Rows mapping joint velocities to the linear velocity of the end-effector.
    pub fn linear(&self) -> Matrix3xX<Expr> {
        self.matrix.fixed_rows::<3>(0).into_owned()
    }

    /// Rows mapping joint velocities to the angular velocity of the end-effector.
    pub fn angular(&self) -> Matrix3xX<Expr> {
        self.matrix.fixed_rows::<3>(3).into_owned()
    }

    /// Jacobian with every entry brought to the simplified normal form.
    pub fn simplified(&self) -> SymbolicJacobian {
        self.matrix.map(|e| e.simplify())
    }

    /// Numeric Jacobian with all symbols taken from `bindings`.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<DMatrix<f64>, KinematicsError> {
        evaluate_matrix(&self.matrix, bindings)
    }
}

/// Function to compute the geometric Jacobian of a revolute serial chain
///
/// The robot is evaluated first at `joints` so that its frames match the requested
/// configuration. Column j is then `z × (p_e − o)` (linear) and `z` (angular), where z and o
/// are the rotation axis and origin of joint j: the base z axis and origin for joint 0 and the
/// z axis and origin of frame j-1 for the others. All floating point literals of the result are
/// rounded to 8 decimal digits. The robot must report one frame per degree of freedom.
pub fn compute_jacobian(robot: &mut impl SymbolicKinematics, joints: Option<&Joints>)
                        -> Result<SymbolicJacobian, KinematicsError> {
    let pose = robot.forward(joints)?;
    let end_effector = translation(&pose);
    let dof = robot.dof();
    let frames = robot.frames();
    if frames.len() != dof {
        return Err(KinematicsError::JointCountMismatch { expected: dof, found: frames.len() });
    }
    debug!(columns = dof, "deriving Jacobian");

    let mut jacobian = SymbolicJacobian::zeros(dof);
    let mut axis = Vector3::new(Expr::zero(), Expr::zero(), Expr::one());
    let mut origin = Vector3::new(Expr::zero(), Expr::zero(), Expr::zero());

    for (j, frame) in frames.iter().enumerate() {
        let linear = axis.cross(&(&end_effector - &origin));
        jacobian.fixed_view_mut::<3, 1>(0, j).copy_from(&linear);
        jacobian.fixed_view_mut::<3, 1>(3, j).copy_from(&axis);
        axis = z_axis(frame);
        origin = translation(frame);
    }

    Ok(jacobian.map(|e| e.round_floats(ROUNDING_DIGITS)))
}
