//! Helper functions

use nalgebra::storage::RawStorage;
use nalgebra::{DMatrix, Dim, Matrix};

use crate::expression::{Bindings, Expr};
use crate::kinematic_traits::Pose;
use crate::kinematics_error::KinematicsError;

/// Converts numeric joint values (radians) to joint expressions for evaluation.
pub fn joints(values: &[f64]) -> Vec<Expr> {
    values.iter().map(|&v| Expr::from(v)).collect()
}

/// Allows to specify joint values in degrees (converts to radians)
pub fn as_radians(degrees: &[i32]) -> Vec<Expr> {
    degrees.iter().map(|&d| Expr::from((d as f64).to_radians())).collect()
}

/// Binds numeric values to symbolic joint variables, in order.
pub fn joint_bindings(variables: &[Expr], values: &[f64]) -> Result<Bindings, KinematicsError> {
    if variables.len() != values.len() {
        return Err(KinematicsError::JointCountMismatch {
            expected: variables.len(),
            found: values.len(),
        });
    }
    variables
        .iter()
        .zip(values)
        .map(|(variable, &value)| match variable.as_symbol() {
            Some(name) => Ok((name.to_string(), value)),
            None => Err(KinematicsError::NotASymbol(variable.to_string())),
        })
        .collect()
}

/// Evaluates every entry of a symbolic matrix.
pub fn evaluate_matrix<R, C, S>(matrix: &Matrix<Expr, R, C, S>, bindings: &Bindings)
                                -> Result<DMatrix<f64>, KinematicsError>
where
    R: Dim,
    C: Dim,
    S: RawStorage<Expr, R, C>,
{
    let (rows, cols) = matrix.shape();
    let mut numeric = DMatrix::zeros(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            numeric[(row, col)] = matrix[(row, col)].evaluate(bindings)?;
        }
    }
    Ok(numeric)
}

/// Pose with every entry brought to the simplified normal form.
pub fn simplify_pose(pose: &Pose) -> Pose {
    pose.map(|e| e.simplify())
}

/// Print a symbolic matrix, one row per line.
pub fn dump_matrix<R, C, S>(matrix: &Matrix<Expr, R, C, S>)
where
    R: Dim,
    C: Dim,
    S: RawStorage<Expr, R, C>,
{
    let (rows, cols) = matrix.shape();
    for row in 0..rows {
        let entries: Vec<String> = (0..cols).map(|col| matrix[(row, col)].to_string()).collect();
        println!("[{}]", entries.join(", "));
    }
}

/// Print a numeric matrix with fixed precision, one row per line.
pub fn dump_numeric(matrix: &DMatrix<f64>) {
    for row in matrix.row_iter() {
        let mut row_str = String::new();
        for value in row.iter() {
            row_str.push_str(&format!("{:9.5} ", value));
        }
        println!("[{}]", row_str.trim_end());
    }
}

/// formatting for YAML output, angles
pub(crate) fn deg(x: &Expr) -> String {
    match x.as_number() {
        Some(v) if v == 0.0 => "0".to_string(),
        Some(v) => format!("deg({:.4})", v.to_degrees()),
        None => quoted(x),
    }
}

/// formatting for YAML output, lengths
pub(crate) fn scalar(x: &Expr) -> String {
    match x.as_number() {
        Some(v) => v.to_string(),
        None => quoted(x),
    }
}

/// Symbols may contain brackets that YAML flow collections do not allow unquoted.
fn quoted(x: &Expr) -> String {
    format!("\"{}\"", x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix2;

    #[test]
    fn test_joint_bindings() {
        let variables = Expr::symbols("q[0], q[1]");
        let bindings = joint_bindings(&variables, &[0.5, -1.0]).unwrap();
        assert_eq!(bindings.get("q[0]"), Some(&0.5));
        assert_eq!(bindings.get("q[1]"), Some(&-1.0));
    }

    #[test]
    fn test_joint_bindings_errors() {
        let variables = Expr::symbols("q[0]");
        assert_eq!(joint_bindings(&variables, &[]),
                   Err(KinematicsError::JointCountMismatch { expected: 1, found: 0 }));
        let compound = vec![Expr::symbol("x") + Expr::symbol("y")];
        assert!(matches!(joint_bindings(&compound, &[1.0]), Err(KinematicsError::NotASymbol(_))));
    }

    #[test]
    fn test_evaluate_matrix() {
        let x = Expr::symbol("x");
        let m = Matrix2::new(x.clone(), x.cos(), Expr::from(2.0), x.clone() * x);
        let bindings: Bindings = [("x".to_string(), 3.0)].into_iter().collect();
        let numeric = evaluate_matrix(&m, &bindings).unwrap();
        assert_eq!(numeric[(0, 0)], 3.0);
        assert_eq!(numeric[(0, 1)], 3.0f64.cos());
        assert_eq!(numeric[(1, 0)], 2.0);
        assert_eq!(numeric[(1, 1)], 9.0);
    }

    #[test]
    fn test_deg() {
        assert_eq!(deg(&Expr::from(0.0)), "0");
        assert_eq!(deg(&Expr::from(std::f64::consts::FRAC_PI_2)), "deg(90.0000)");
        assert_eq!(deg(&Expr::symbol("alpha_1")), "\"alpha_1\"");
        assert_eq!(scalar(&Expr::from(-0.425)), "-0.425");
        assert_eq!(scalar(&Expr::symbol("q[1]")), "\"q[1]\"");
    }

    #[test]
    fn test_simplify_pose() {
        let mut chain = crate::parameters::dh_kinematics::Parameters::symbolic(2).to_chain();
        let pose = chain.evaluate(None).unwrap();
        // Rotation block of R^T R is the identity once sin^2 + cos^2 = 1 is applied
        let gram = pose.transpose() * &pose;
        let simplified = simplify_pose(&gram);
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(simplified[(row, col)], Expr::from(expected), "entry ({}, {})", row, col);
            }
        }
        assert_eq!(simplify_pose(&pose)[(3, 3)], Expr::from(1.0));
    }

    #[test]
    fn test_as_radians() {
        let qs = as_radians(&[180, 0]);
        assert!((qs[0].as_number().unwrap() - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(qs[1], Expr::from(0.0));
    }
}
