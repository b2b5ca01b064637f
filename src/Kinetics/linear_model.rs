use super::kinetic_models::KineticModel;
use super::reaction_model::{ModelError, ReactionModel, TimeGrid};
use super::trajectory::Trajectory;
use log::info;

/// Toy linear approximation: reactant(t) = initial - c * k * t, product(t) = c * k * t.
/// Amounts are not clamped and go negative for large t.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearModel;

impl KineticModel for LinearModel {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn simulate(
        &self,
        reaction: &ReactionModel,
        initial_reactant_amounts: &[f64],
        grid: &TimeGrid,
    ) -> Result<Trajectory, ModelError> {
        reaction.validate_initial_amounts(initial_reactant_amounts)?;
        info!("linear model on {} time points", grid.len());
        let k = reaction.forward_rate();
        let reactant_amounts = reaction
            .reactant_coefficients()
            .iter()
            .zip(initial_reactant_amounts)
            .map(|(c, initial)| grid.points().iter().map(|t| initial - c * k * t).collect())
            .collect();
        let product_amounts = reaction
            .product_coefficients()
            .iter()
            .map(|c| grid.points().iter().map(|t| c * k * t).collect())
            .collect();
        Ok(Trajectory::from_series(
            self.name(),
            grid.points().to_vec(),
            reactant_amounts,
            product_amounts,
            reaction.labels(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stoichiometry::equation::Equation;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_a_to_b() {
        let mut equation = Equation::from_formulas(&["A"], &["B"]).unwrap();
        equation.set_coefficients(vec![1.0], vec![1.0]).unwrap();
        let reaction = ReactionModel::new(equation, 1.0, None).unwrap();
        let trajectory = reaction.calculate_linear_model(&[10.0], 1.0, 10.0).unwrap();
        assert_eq!(trajectory.n_points(), 10);
        assert_relative_eq!(trajectory.time()[5], 5.0);
        assert_relative_eq!(trajectory.reactant(0)[5], 5.0);
        assert_relative_eq!(trajectory.product(0)[5], 5.0);
    }

    #[test]
    fn test_linear_is_not_clamped() {
        let mut equation = Equation::from_formulas(&["H2", "O2"], &["H2O"]).unwrap();
        equation.balance().unwrap();
        let reaction = ReactionModel::new(equation, 0.5, None).unwrap();
        let trajectory = reaction.calculate_linear_model(&[1.0, 1.0], 1.0, 5.0).unwrap();
        // H2: 1 - 2 * 0.5 * 4
        assert_relative_eq!(trajectory.reactant(0)[4], -3.0);
        assert_relative_eq!(trajectory.reactant(1)[4], -1.0);
        assert_relative_eq!(trajectory.product(0)[4], 4.0);
        assert_eq!(trajectory.labels, vec!["H2", "O2", "H2O"]);
    }
}
