//! # Equilibrium relaxation model
//!
//! Reversible model computed step by step in increasing time order. At each time point the
//! equilibrium targets are recomputed from the running ratios
//!
//!   target_reactant[i] = initial[i] + c[i] * (product_ratio - reactant_ratio)
//!   target_product[j]  = c[j] * (reactant_ratio - product_ratio)
//!
//! and the current amounts relax towards them with the combined rate k_forward + k_reverse
//! over the interval elapsed since the previous time point. With a positive reverse rate the
//! ratios are then recomputed from the new amounts, so every point depends on all the previous
//! ones. With k_reverse = 0 the ratios stay fixed and the result coincides with
//! `SimpleExponentialModel` at every grid point.
//!
//! The running values are an explicit `EquilibriumState` passed through `EquilibriumModel::step`.
use super::kinetic_models::KineticModel;
use super::reaction_model::{ModelError, ReactionModel, TimeGrid};
use super::trajectory::Trajectory;
use log::{debug, info};

/// Accumulator carried from one time point to the next
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumState {
    pub reactant_amounts: Vec<f64>,
    pub product_amounts: Vec<f64>,
    pub min_reactant_ratio: f64,
    pub min_product_ratio: f64,
    /// time of the last processed point
    pub time: f64,
}

impl EquilibriumState {
    /// initial amounts, no products, limiting ratio of the reactants, time 0
    pub fn initial(
        reaction: &ReactionModel,
        initial_reactant_amounts: &[f64],
    ) -> Result<Self, ModelError> {
        reaction.validate_initial_amounts(initial_reactant_amounts)?;
        Ok(Self {
            reactant_amounts: initial_reactant_amounts.to_vec(),
            product_amounts: vec![0.0; reaction.n_products()],
            min_reactant_ratio: reaction.limiting_ratio(initial_reactant_amounts)?,
            min_product_ratio: 0.0,
            time: 0.0,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EquilibriumModel;

impl EquilibriumModel {
    /// Advances `state` to time `t`. Pure: the new state depends only on the arguments.
    pub fn step(
        reaction: &ReactionModel,
        initial_reactant_amounts: &[f64],
        state: &EquilibriumState,
        t: f64,
    ) -> Result<EquilibriumState, ModelError> {
        if t < state.time {
            return Err(ModelError::InvalidTimeGrid(format!(
                "time {} is before the previous point {}",
                t, state.time
            )));
        }
        let dt = t - state.time;
        let rate = reaction.forward_rate() + reaction.reverse_rate();
        let extent = state.min_reactant_ratio - state.min_product_ratio;

        let reactant_amounts: Vec<f64> = reaction
            .reactant_coefficients()
            .iter()
            .zip(initial_reactant_amounts)
            .zip(&state.reactant_amounts)
            .map(|((c, initial), current)| {
                let target = initial - c * extent;
                relax(*current, target, c * rate * dt)
            })
            .collect();
        let product_amounts: Vec<f64> = reaction
            .product_coefficients()
            .iter()
            .zip(&state.product_amounts)
            .map(|(c, current)| {
                let target = c * extent;
                relax(*current, target, c * rate * dt)
            })
            .collect();

        let (min_reactant_ratio, min_product_ratio) = if reaction.is_reversible() {
            (
                reaction.limiting_ratio(&reactant_amounts)?,
                reaction.product_ratio(&product_amounts)?,
            )
        } else {
            (state.min_reactant_ratio, state.min_product_ratio)
        };

        Ok(EquilibriumState {
            reactant_amounts,
            product_amounts,
            min_reactant_ratio,
            min_product_ratio,
            time: t,
        })
    }
}

// target - (target - current) * exp(-exponent)
fn relax(current: f64, target: f64, exponent: f64) -> f64 {
    target - (target - current) * (-exponent).exp()
}

impl KineticModel for EquilibriumModel {
    fn name(&self) -> &'static str {
        "equilibrium"
    }

    fn simulate(
        &self,
        reaction: &ReactionModel,
        initial_reactant_amounts: &[f64],
        grid: &TimeGrid,
    ) -> Result<Trajectory, ModelError> {
        let mut state = EquilibriumState::initial(reaction, initial_reactant_amounts)?;
        info!(
            "equilibrium model on {} time points, k_forward {}, k_reverse {}",
            grid.len(),
            reaction.forward_rate(),
            reaction.reverse_rate()
        );
        let mut reactant_amounts = vec![Vec::with_capacity(grid.len()); reaction.n_reactants()];
        let mut product_amounts = vec![Vec::with_capacity(grid.len()); reaction.n_products()];
        for &t in grid.points() {
            state = Self::step(reaction, initial_reactant_amounts, &state, t)?;
            for (series, amount) in reactant_amounts.iter_mut().zip(&state.reactant_amounts) {
                series.push(*amount);
            }
            for (series, amount) in product_amounts.iter_mut().zip(&state.product_amounts) {
                series.push(*amount);
            }
        }
        debug!(
            "final ratios: reactants {}, products {}",
            state.min_reactant_ratio, state.min_product_ratio
        );
        Ok(Trajectory::from_series(
            self.name(),
            grid.points().to_vec(),
            reactant_amounts,
            product_amounts,
            reaction.labels(),
        ))
    }
}
