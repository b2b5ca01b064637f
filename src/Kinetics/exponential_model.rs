use super::kinetic_models::KineticModel;
use super::reaction_model::{ModelError, ReactionModel, TimeGrid};
use super::trajectory::Trajectory;
use log::info;

/// Irreversible first-order relaxation towards full conversion of the limiting reactant:
/// reactant(t) = final + c * L * exp(-c k t), product(t) = final * (1 - exp(-c k t))
/// where L is the limiting ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleExponentialModel;

impl SimpleExponentialModel {
    /// amounts after full conversion of the limiting reactant
    pub fn final_amounts(
        reaction: &ReactionModel,
        initial_reactant_amounts: &[f64],
    ) -> Result<(Vec<f64>, Vec<f64>), ModelError> {
        reaction.validate_initial_amounts(initial_reactant_amounts)?;
        let limiting_ratio = reaction.limiting_ratio(initial_reactant_amounts)?;
        let final_reactants = reaction
            .reactant_coefficients()
            .iter()
            .zip(initial_reactant_amounts)
            .map(|(c, initial)| initial - c * limiting_ratio)
            .collect();
        let final_products = reaction
            .product_coefficients()
            .iter()
            .map(|c| c * limiting_ratio)
            .collect();
        Ok((final_reactants, final_products))
    }
}

impl KineticModel for SimpleExponentialModel {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn simulate(
        &self,
        reaction: &ReactionModel,
        initial_reactant_amounts: &[f64],
        grid: &TimeGrid,
    ) -> Result<Trajectory, ModelError> {
        let (final_reactants, final_products) =
            Self::final_amounts(reaction, initial_reactant_amounts)?;
        let limiting_ratio = reaction.limiting_ratio(initial_reactant_amounts)?;
        info!(
            "exponential model on {} time points, limiting ratio {}",
            grid.len(),
            limiting_ratio
        );
        let k = reaction.forward_rate();
        let reactant_amounts = reaction
            .reactant_coefficients()
            .iter()
            .zip(final_reactants)
            .map(|(c, end)| {
                grid.points()
                    .iter()
                    .map(|t| end + c * limiting_ratio * (-c * k * t).exp())
                    .collect()
            })
            .collect();
        let product_amounts = reaction
            .product_coefficients()
            .iter()
            .zip(final_products)
            .map(|(c, end)| {
                grid.points()
                    .iter()
                    .map(|t| end * (1.0 - (-c * k * t).exp()))
                    .collect()
            })
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
