//! Defines the DH parameter table data structure

pub mod dh_kinematics {
    use num_traits::Zero;

    use crate::expression::Expr;
    use crate::kinematic_chain::KinematicChain;
    use crate::utils::{deg, scalar};

    /// Denavit-Hartenberg parameters of one link. Every value can be numeric or symbolic.
    #[derive(Debug, Clone, PartialEq)]
    pub struct LinkParameters {
        /// Link length: distance between the z axes along the common normal.
        pub a: Expr,

        /// Link offset: distance along the previous z axis to the common normal.
        pub d: Expr,

        /// Twist angle between the z axes about the common normal.
        pub alpha: Expr,

        /// Joint angle offset about the previous z axis. The joint value is added to it.
        pub theta: Expr,

        /// Custom joint variable. When None, the chain generates a `q[i]` symbol.
        pub joint: Option<Expr>,
    }

    impl LinkParameters {
        pub fn new(a: impl Into<Expr>, d: impl Into<Expr>, alpha: impl Into<Expr>, theta: impl Into<Expr>) -> Self {
            LinkParameters { a: a.into(), d: d.into(), alpha: alpha.into(), theta: theta.into(), joint: None }
        }

        /// Same parameters with a custom joint variable.
        pub fn with_joint(self, joint: Expr) -> Self {
            LinkParameters { joint: Some(joint), ..self }
        }
    }

    /// DH table of a serial manipulator. See [parameters_robots.rs](parameters_robots.rs)
    /// for examples of concrete robot models.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Parameters {
        /// Links from the base outwards.
        pub links: Vec<LinkParameters>,

        /// Translation of the tool center point relative to the last link frame.
        pub tcp_offset: [Expr; 3],
    }

    impl Default for Parameters {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Parameters {
        /// Empty table with zero TCP offset.
        pub fn new() -> Self {
            Parameters { links: Vec::new(), tcp_offset: [Expr::zero(), Expr::zero(), Expr::zero()] }
        }

        /// Kinematic chain with these links and TCP offset.
        pub fn to_chain(&self) -> KinematicChain {
            KinematicChain::from_parameters(self)
        }

        /// Convert to string yaml representation (quick viewing, etc).
        /// Numeric angles are written as `deg(...)`, symbolic values by name.
        pub fn to_yaml(&self) -> String {
            let mut yaml = String::from("dh_parameters:\n");
            for link in &self.links {
                yaml.push_str(&format!(
                    "  - {{ a: {}, d: {}, alpha: {}, theta: {}",
                    scalar(&link.a), scalar(&link.d), deg(&link.alpha), deg(&link.theta)
                ));
                if let Some(joint) = &link.joint {
                    yaml.push_str(&format!(", joint: {}", scalar(joint)));
                }
                yaml.push_str(" }\n");
            }
            yaml.push_str(&format!(
                "tcp_offset: [{}, {}, {}]\n",
                scalar(&self.tcp_offset[0]), scalar(&self.tcp_offset[1]), scalar(&self.tcp_offset[2])
            ));
            yaml
        }
    }
}
