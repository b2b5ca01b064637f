/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Kinetics::kinetic_models::{KineticModel, ModelKind, create_model_by_name};
    use crate::Kinetics::reaction_model::{ModelError, ReactionModel, TimeGrid};
    use crate::Stoichiometry::equation::Equation;
    use approx::assert_relative_eq;

    fn balanced_reaction(
        reactants: &[&str],
        products: &[&str],
        k_forward: f64,
        k_reverse: Option<f64>,
    ) -> ReactionModel {
        let mut equation = Equation::from_formulas(reactants, products).unwrap();
        equation.balance().unwrap();
        ReactionModel::new(equation, k_forward, k_reverse).unwrap()
    }

    #[test]
    fn test_a_to_b_scenario_through_balancer() {
        // A = B has a trivial solution and falls back to unit coefficients
        let reaction = balanced_reaction(&["A"], &["B"], 1.0, None);
        assert_eq!(reaction.reactant_coefficients(), &[1.0]);
        assert_eq!(reaction.product_coefficients(), &[1.0]);
        let trajectory = reaction
            .simulate(ModelKind::Linear, &[10.0], 1.0, 10.0)
            .unwrap();
        let i = trajectory.time().iter().position(|&t| t == 5.0).unwrap();
        assert_relative_eq!(trajectory.reactant(0)[i], 5.0);
        assert_relative_eq!(trajectory.product(0)[i], 5.0);
    }

    #[test]
    fn test_every_model_starts_at_initial_amounts() {
        let reaction = balanced_reaction(&["CH4", "O2"], &["CO2", "H2O"], 0.7, Some(0.2));
        let initial = [2.0, 3.0];
        for kind in ModelKind::all() {
            let trajectory = reaction.simulate(kind, &initial, 0.05, 1.0).unwrap();
            assert_eq!(trajectory.model, kind.to_string());
            assert_eq!(trajectory.n_points(), 20);
            assert_relative_eq!(trajectory.reactant(0)[0], 2.0);
            assert_relative_eq!(trajectory.reactant(1)[0], 3.0);
            assert_relative_eq!(trajectory.product(0)[0], 0.0);
            assert_relative_eq!(trajectory.product(1)[0], 0.0);
        }
    }

    #[test]
    fn test_irreversible_equilibrium_matches_simple_exponential() {
        let reaction = balanced_reaction(&["H2", "O2"], &["H2O"], 1.3, None);
        let initial = [3.0, 4.0];
        let simple = reaction
            .calculate_simple_exponential_model(&initial, 0.01, 3.0)
            .unwrap();
        let equilibrium = reaction
            .calculate_equilibrium_model(&initial, 0.01, 3.0)
            .unwrap();
        assert_eq!(simple.n_points(), equilibrium.n_points());
        assert_eq!(simple.time(), equilibrium.time());
        for (a, b) in simple.y_result.iter().zip(equilibrium.y_result.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reverse_rate_changes_equilibrium_trajectory() {
        let initial = [3.0, 4.0];
        let forward = balanced_reaction(&["H2", "O2"], &["H2O"], 1.0, None)
            .calculate_equilibrium_model(&initial, 0.1, 2.0)
            .unwrap();
        let reversible = balanced_reaction(&["H2", "O2"], &["H2O"], 1.0, Some(0.5))
            .calculate_equilibrium_model(&initial, 0.1, 2.0)
            .unwrap();
        assert_relative_eq!(forward.y_result[(0, 0)], reversible.y_result[(0, 0)]);
        let differs = forward
            .y_result
            .iter()
            .zip(reversible.y_result.iter())
            .any(|(a, b)| (a - b).abs() > 1e-6);
        assert!(differs);
    }

    #[test]
    fn test_models_through_enum_dispatch() {
        let reaction = balanced_reaction(&["H2", "O2"], &["H2O"], 1.0, None);
        let grid = TimeGrid::new(0.5, 2.0).unwrap();
        for name in ["linear", "exponential", "equilibrium"] {
            let model = create_model_by_name(name).unwrap();
            let trajectory = model.simulate(&reaction, &[2.0, 1.0], &grid).unwrap();
            assert_eq!(trajectory.model, name);
            assert_eq!(trajectory.labels, vec!["H2", "O2", "H2O"]);
            assert_eq!(trajectory.time(), grid.points());
        }
    }

    #[test]
    fn test_mismatched_initial_amounts() {
        let reaction = balanced_reaction(&["H2", "O2"], &["H2O"], 1.0, None);
        for kind in ModelKind::all() {
            assert_eq!(
                reaction.simulate(kind, &[1.0], 0.1, 1.0).unwrap_err(),
                ModelError::LengthMismatch {
                    expected: 2,
                    found: 1
                }
            );
        }
    }

    #[test]
    fn test_zero_reactant_coefficient_fails_every_model() {
        let mut equation = Equation::from_formulas(&["A", "B"], &["C"]).unwrap();
        equation.set_coefficients(vec![0.0, 1.0], vec![1.0]).unwrap();
        let reaction = ReactionModel::new(equation, 1.0, None).unwrap();
        for kind in ModelKind::all() {
            assert!(matches!(
                reaction.simulate(kind, &[1.0, 1.0], 0.1, 1.0),
                Err(ModelError::ZeroCoefficient { index: 0, .. })
            ));
        }
    }

    #[test]
    fn test_invalid_grid() {
        let reaction = balanced_reaction(&["H2", "O2"], &["H2O"], 1.0, None);
        assert!(matches!(
            reaction.simulate(ModelKind::Linear, &[1.0, 1.0], -0.1, 1.0),
            Err(ModelError::InvalidTimeGrid(_))
        ));
    }
}
