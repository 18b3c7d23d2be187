//! Errors reported by the symbolic engine and the kinematic chain

/// Failures of chain evaluation, Jacobian derivation and expression handling.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    EmptyChain,
    JointCountMismatch { expected: usize, found: usize },
    NotASymbol(String),
    UnboundSymbol(String),
}

impl std::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            KinematicsError::EmptyChain =>
                write!(f, "Kinematic chain has no links"),
            KinematicsError::JointCountMismatch { expected, found } =>
                write!(f, "Joint count mismatch: expected {}, found {}", expected, found),
            KinematicsError::NotASymbol(ref expr) =>
                write!(f, "Expression is not a symbol: {}", expr),
            KinematicsError::UnboundSymbol(ref name) =>
                write!(f, "No value bound to symbol: {}", name),
        }
    }
}

impl std::error::Error for KinematicsError {}
