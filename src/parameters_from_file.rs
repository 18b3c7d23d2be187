//! Supports extracting DH parameter tables from YAML file (optional)

use std::path::Path;
use std::sync::LazyLock;

use num_traits::Zero;
use regex::Regex;
use yaml_rust2::{Yaml, YamlLoader};

use crate::expression::Expr;
use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::{LinkParameters, Parameters};

static DEGREES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-)?deg\(\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*\)$").expect("valid regex")
});

static SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\[[0-9]+\])?$").expect("valid regex")
});

impl Parameters {
    /// Read the DH table from YAML file. YAML file like this is supported:
    /// ```yaml
    /// # UR5, standard DH
    /// dh_parameters:
    ///   - { a: 0.0, d: 0.089159, alpha: deg(90), theta: 0 }
    ///   - { a: -0.425, d: 0, alpha: 0, theta: 0 }
    ///   - { a: -0.39225, d: 0, alpha: 0, theta: 0 }
    ///   - { a: 0, d: 0.10915, alpha: deg(90), theta: 0 }
    ///   - { a: 0, d: 0.09465, alpha: deg(-90), theta: 0 }
    ///   - { a: 0, d: 0.0823, alpha: 0, theta: 0, joint: wrist_3 }
    /// tcp_offset: [0.0, 0.0, 0.1]
    /// ```
    /// Values are numbers (angles in radians), `deg(angle)` for angles in degrees,
    /// or symbol names for symbolic parameters. `joint` and `tcp_offset` are optional.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Same as [`Parameters::from_yaml_file`], from the YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ParameterError::ParseError(format!("{}", e)))?;
        let doc = docs
            .first()
            .ok_or_else(|| ParameterError::ParseError("empty document".to_string()))?;

        let table = doc["dh_parameters"]
            .as_vec()
            .ok_or_else(|| ParameterError::MissingField("dh_parameters".to_string()))?;

        let mut links = Vec::with_capacity(table.len());
        for (i, row) in table.iter().enumerate() {
            let field = |name: &str| format!("dh_parameters[{}].{}", i, name);
            let mut link = LinkParameters::new(
                parse_value(&row["a"], &field("a"), false)?,
                parse_value(&row["d"], &field("d"), false)?,
                parse_value(&row["alpha"], &field("alpha"), true)?,
                parse_value(&row["theta"], &field("theta"), true)?,
            );
            match &row["joint"] {
                Yaml::BadValue | Yaml::Null => {}
                Yaml::String(name) => link = link.with_joint(parse_symbol(name, &field("joint"))?),
                other => {
                    return Err(ParameterError::ParseError(format!(
                        "{} must be a symbol name (got {:?})", field("joint"), other
                    )));
                }
            }
            links.push(link);
        }

        let tcp_offset = match &doc["tcp_offset"] {
            Yaml::BadValue | Yaml::Null => [Expr::zero(), Expr::zero(), Expr::zero()],
            Yaml::Array(values) => {
                if values.len() != 3 {
                    return Err(ParameterError::InvalidLength { expected: 3, found: values.len() });
                }
                [
                    parse_value(&values[0], "tcp_offset[0]", false)?,
                    parse_value(&values[1], "tcp_offset[1]", false)?,
                    parse_value(&values[2], "tcp_offset[2]", false)?,
                ]
            }
            _ => return Err(ParameterError::ParseError("tcp_offset must be a list [x, y, z]".to_string())),
        };

        Ok(Parameters { links, tcp_offset })
    }
}

/// Numeric literal, deg(angle) (only if `angle` is set) or symbol name.
fn parse_value(yaml: &Yaml, field: &str, angle: bool) -> Result<Expr, ParameterError> {
    match yaml {
        Yaml::Integer(v) => Ok(Expr::from(*v as f64)),
        Yaml::Real(_) => yaml
            .as_f64()
            .map(Expr::from)
            .ok_or_else(|| ParameterError::ParseError(format!("{} is not a valid number", field))),
        Yaml::String(text) => parse_text(text.trim(), field, angle),
        Yaml::BadValue | Yaml::Null => Err(ParameterError::MissingField(field.to_string())),
        other => Err(ParameterError::ParseError(format!(
            "{} must be a number or symbol (got {:?})", field, other
        ))),
    }
}

fn parse_text(text: &str, field: &str, angle: bool) -> Result<Expr, ParameterError> {
    if let Some(captures) = DEGREES.captures(text) {
        if !angle {
            return Err(ParameterError::WrongAngle(format!(
                "{} is not an angle, deg() is not allowed (got {})", field, text
            )));
        }
        let degrees: f64 = captures[2]
            .parse()
            .map_err(|_| ParameterError::WrongAngle(format!("{}: {}", field, text)))?;
        let sign = if captures.get(1).is_some() { -1.0 } else { 1.0 };
        return Ok(Expr::from(sign * degrees.to_radians()));
    }
    if text.starts_with("deg") || text.starts_with("-deg") {
        return Err(ParameterError::WrongAngle(format!("{}: {}", field, text)));
    }
    parse_symbol(text, field)
}

fn parse_symbol(text: &str, field: &str) -> Result<Expr, ParameterError> {
    if SYMBOL.is_match(text) {
        Ok(Expr::symbol(text))
    } else {
        Err(ParameterError::ParseError(format!("{} is not a valid symbol name: {}", field, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_parse_text() {
        let v = parse_text("deg(90)", "alpha", true).unwrap();
        assert!((v.as_number().unwrap() - FRAC_PI_2).abs() < 1e-12);
        let v = parse_text("-deg(45.5)", "alpha", true).unwrap();
        assert!((v.as_number().unwrap() + 45.5f64.to_radians()).abs() < 1e-12);
        assert_eq!(parse_text("a_1", "a", false).unwrap(), Expr::symbol("a_1"));
        assert_eq!(parse_text("q[3]", "joint", false).unwrap(), Expr::symbol("q[3]"));
    }

    #[test]
    fn test_parse_text_rejects() {
        assert!(matches!(parse_text("deg(90)", "a", false), Err(ParameterError::WrongAngle(_))));
        assert!(matches!(parse_text("deg(ninety)", "alpha", true), Err(ParameterError::WrongAngle(_))));
        assert!(matches!(parse_text("1abc", "d", false), Err(ParameterError::ParseError(_))));
        assert!(matches!(parse_text("a + b", "d", false), Err(ParameterError::ParseError(_))));
    }

    #[test]
    fn test_minimal_document() {
        let parameters = Parameters::from_yaml_str(
            "dh_parameters:\n  - { a: 1, d: 0.5, alpha: 0, theta: deg(180) }\n",
        ).unwrap();
        assert_eq!(parameters.links.len(), 1);
        assert_eq!(parameters.links[0].a, Expr::from(1.0));
        assert_eq!(parameters.links[0].d, Expr::from(0.5));
        assert!(parameters.links[0].joint.is_none());
        assert_eq!(parameters.tcp_offset, [Expr::zero(), Expr::zero(), Expr::zero()]);
    }
}
