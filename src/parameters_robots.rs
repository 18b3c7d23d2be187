//! Hardcoded DH parameters for a few robots

pub mod dh_kinematics {
    use crate::expression::Expr;
    use crate::parameters::dh_kinematics::{LinkParameters, Parameters};
    use std::f64::consts::FRAC_PI_2;

    impl Parameters {
        /// Universal Robots UR5, standard DH convention.
        pub fn ur5() -> Self {
            Parameters {
                links: vec![
                    LinkParameters::new(0.0, 0.089159, FRAC_PI_2, 0.0),
                    LinkParameters::new(-0.425, 0.0, 0.0, 0.0),
                    LinkParameters::new(-0.39225, 0.0, 0.0, 0.0),
                    LinkParameters::new(0.0, 0.10915, FRAC_PI_2, 0.0),
                    LinkParameters::new(0.0, 0.09465, -FRAC_PI_2, 0.0),
                    LinkParameters::new(0.0, 0.0823, 0.0, 0.0),
                ],
                ..Self::new()
            }
        }

        /// Unimation PUMA 560, standard DH convention.
        pub fn puma560() -> Self {
            Parameters {
                links: vec![
                    LinkParameters::new(0.0, 0.0, FRAC_PI_2, 0.0),
                    LinkParameters::new(0.4318, 0.0, 0.0, 0.0),
                    LinkParameters::new(0.0203, 0.15005, -FRAC_PI_2, 0.0),
                    LinkParameters::new(0.0, 0.4318, FRAC_PI_2, 0.0),
                    LinkParameters::new(0.0, 0.0, -FRAC_PI_2, 0.0),
                    LinkParameters::new(0.0, 0.0, 0.0, 0.0),
                ],
                ..Self::new()
            }
        }

        /// Planar arm with parallel joint axes and the given link lengths.
        pub fn planar(lengths: &[f64]) -> Self {
            Parameters {
                links: lengths.iter().map(|&a| LinkParameters::new(a, 0.0, 0.0, 0.0)).collect(),
                ..Self::new()
            }
        }

        /// Fully symbolic chain of `links` links: link i has parameters
        /// `a_i`, `d_i`, `alpha_i` and `theta_i`.
        pub fn symbolic(links: usize) -> Self {
            Parameters {
                links: (0..links)
                    .map(|i| {
                        LinkParameters::new(
                            Expr::symbol(format!("a_{}", i)),
                            Expr::symbol(format!("d_{}", i)),
                            Expr::symbol(format!("alpha_{}", i)),
                            Expr::symbol(format!("theta_{}", i)),
                        )
                    })
                    .collect(),
                ..Self::new()
            }
        }
    }
}
