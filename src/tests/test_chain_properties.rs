#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};

    use crate::expression::{Bindings, Expr, ROUNDING_DIGITS};
    use crate::kinematic_chain::KinematicChain;
    use crate::kinematics_error::KinematicsError;
    use crate::tests::test_utils::{approx, random_numeric_chain};
    use crate::utils::{evaluate_matrix, joint_bindings, joints};

    #[test]
    fn test_random_chain_evaluates() {
        let mut chain = random_numeric_chain(7);
        assert_eq!(chain.link_count(), 7);
        assert_eq!(chain.joint_variables().len(), 7);

        let pose = chain.evaluate(None).expect("7 link chain must evaluate");
        assert_eq!(chain.cumulative_transforms().len(), 7);
        for col in 0..3 {
            assert!(pose[(3, col)].is_zero(), "bottom row must be [0, 0, 0, 1]");
        }
        assert!(pose[(3, 3)].is_one());
    }

    #[test]
    fn test_pose_is_already_rounded() {
        let mut chain = random_numeric_chain(4);
        let pose = chain.evaluate(None).unwrap();
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(pose[(row, col)].round_floats(ROUNDING_DIGITS), pose[(row, col)]);
            }
        }
    }

    #[test]
    fn test_cumulative_transforms_are_rigid() {
        let mut chain = random_numeric_chain(5);
        let values = [0.1, 0.2, -0.3, 0.4, -0.5];
        chain.evaluate(Some(joints(&values).as_slice())).unwrap();
        let empty = Bindings::new();
        for frame in chain.cumulative_transforms() {
            let frame = evaluate_matrix(frame, &empty).unwrap();
            let rotation = frame.view((0, 0), (3, 3));
            let orthogonality = rotation.transpose() * rotation;
            for i in 0..3 {
                for j in 0..3 {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert!((orthogonality[(i, j)] - expected).abs() < 1e-6);
                }
            }
            assert_eq!(frame.row(3).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_substitution_matches_numeric_evaluation() {
        let mut chain = random_numeric_chain(4);
        let values = [0.9, -0.4, 1.3, 0.2];
        let symbolic = chain.evaluate(None).unwrap();
        let bindings = joint_bindings(chain.joint_variables(), &values).unwrap();
        let substituted = evaluate_matrix(&symbolic, &bindings).unwrap();

        let numeric = chain.evaluate(Some(joints(&values).as_slice())).unwrap();
        for row in 0..4 {
            for col in 0..4 {
                assert!(approx(&numeric[(row, col)], substituted[(row, col)], 1e-6));
            }
        }
    }

    #[test]
    fn test_errors() {
        let mut empty = KinematicChain::new();
        assert_eq!(empty.evaluate(None), Err(KinematicsError::EmptyChain));
        assert_eq!(empty.jacobian(None), Err(KinematicsError::EmptyChain));

        let mut chain = random_numeric_chain(3);
        let result = chain.evaluate(Some(joints(&[0.0, 0.0]).as_slice()));
        assert_eq!(result, Err(KinematicsError::JointCountMismatch { expected: 3, found: 2 }));
    }

    #[test]
    fn test_tcp_offset_moves_along_tool_z() {
        let mut chain = random_numeric_chain(3);
        let without = chain.evaluate(None).unwrap();
        chain.set_tcp_offset(0.0, 0.0, 0.25);
        assert!(chain.has_tcp_offset());
        let with = chain.evaluate(None).unwrap();

        let values = [0.3, 0.6, -0.9];
        let bindings = joint_bindings(chain.joint_variables(), &values).unwrap();
        let without = evaluate_matrix(&without, &bindings).unwrap();
        let with = evaluate_matrix(&with, &bindings).unwrap();
        for row in 0..3 {
            let expected = without[(row, 3)] + 0.25 * without[(row, 2)];
            assert!((with[(row, 3)] - expected).abs() < 1e-6);
            // Orientation does not change
            for col in 0..3 {
                assert!((with[(row, col)] - without[(row, col)]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_theta_offset_adds_to_joint() {
        let mut offset = KinematicChain::new();
        offset.add_link(1.0, 0.0, 0.0, 0.5, None);
        let mut plain = KinematicChain::new();
        plain.add_link(1.0, 0.0, 0.0, 0.0, None);

        let a = offset.evaluate(Some(joints(&[0.25]).as_slice())).unwrap();
        let b = plain.evaluate(Some(joints(&[0.75]).as_slice())).unwrap();
        assert_eq!(a, b);
        assert!(approx(&a[(0, 3)], 0.75f64.cos(), 1e-8));
        assert!(approx(&a[(1, 3)], 0.75f64.sin(), 1e-8));
        assert_eq!(a[(2, 3)], Expr::zero());
    }
}
