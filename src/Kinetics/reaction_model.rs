//! # Reaction model
//!
//! Balanced equation together with the forward rate constant and the optional reverse rate
//! constant. Validation shared by all kinetic models lives here: coefficients used as divisors
//! must be non-zero and there must be one positive initial amount per reactant.
use super::kinetic_models::{
    EquilibriumModel, KineticModel, LinearModel, ModelKind, SimpleExponentialModel,
};
use super::trajectory::Trajectory;
use crate::Stoichiometry::equation::Equation;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("coefficient of {species} (position {index}) is zero")]
    ZeroCoefficient { species: String, index: usize },
    #[error("expected {expected} initial reactant amounts, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("invalid rate constant: {0}")]
    InvalidRate(String),
    #[error("initial amount {value} at position {index} must be positive")]
    InvalidAmount { index: usize, value: f64 },
    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),
    #[error("reaction has no reactants")]
    NoReactants,
    #[error("equation must be balanced before building a reaction model")]
    UnbalancedEquation,
    #[error("unknown kinetic model '{0}', expected linear, exponential or equilibrium")]
    UnknownModel(String),
}

/// upper bound on the number of points of a `TimeGrid`
pub const MAX_TIME_POINTS: usize = 10_000_000;

/// Time points 0, step, 2*step, ... strictly below max_time
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    step: f64,
    max_time: f64,
    points: Vec<f64>,
}

impl TimeGrid {
    pub fn new(step: f64, max_time: f64) -> Result<Self, ModelError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ModelError::InvalidTimeGrid(format!(
                "step {} must be positive",
                step
            )));
        }
        if !(max_time.is_finite() && max_time > 0.0) {
            return Err(ModelError::InvalidTimeGrid(format!(
                "max time {} must be positive",
                max_time
            )));
        }
        let n_points = (max_time / step).ceil();
        if !(n_points <= MAX_TIME_POINTS as f64) {
            return Err(ModelError::InvalidTimeGrid(format!(
                "step {} over max time {} gives more than {} points",
                step, max_time, MAX_TIME_POINTS
            )));
        }
        let n_points = n_points as usize;
        let points = (0..n_points).map(|i| i as f64 * step).collect();
        Ok(Self {
            step,
            max_time,
            points,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ReactionModel {
    equation: Equation,
    forward_rate: f64,
    reverse_rate: f64,
}

impl ReactionModel {
    /// reverse_rate None means irreversible (0)
    pub fn new(
        equation: Equation,
        forward_rate: f64,
        reverse_rate: Option<f64>,
    ) -> Result<Self, ModelError> {
        let reverse_rate = reverse_rate.unwrap_or(0.0);
        if !equation.is_balanced() {
            return Err(ModelError::UnbalancedEquation);
        }
        if equation.reactants().is_empty() {
            return Err(ModelError::NoReactants);
        }
        if !(forward_rate.is_finite() && forward_rate > 0.0) {
            return Err(ModelError::InvalidRate(format!(
                "forward rate {} must be positive",
                forward_rate
            )));
        }
        if !(reverse_rate.is_finite() && reverse_rate >= 0.0) {
            return Err(ModelError::InvalidRate(format!(
                "reverse rate {} must be non-negative",
                reverse_rate
            )));
        }
        Ok(Self {
            equation,
            forward_rate,
            reverse_rate,
        })
    }

    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    pub fn forward_rate(&self) -> f64 {
        self.forward_rate
    }

    pub fn reverse_rate(&self) -> f64 {
        self.reverse_rate
    }

    pub fn is_reversible(&self) -> bool {
        self.reverse_rate > 0.0
    }

    pub fn reactant_coefficients(&self) -> &[f64] {
        self.equation.reactant_coefficients()
    }

    pub fn product_coefficients(&self) -> &[f64] {
        self.equation.product_coefficients()
    }

    pub fn n_reactants(&self) -> usize {
        self.equation.reactants().len()
    }

    pub fn n_products(&self) -> usize {
        self.equation.products().len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.equation.labels()
    }

    /// checks input shared by all models: amounts match reactants and are positive,
    /// no reactant coefficient is zero
    pub fn validate_initial_amounts(&self, initial_reactant_amounts: &[f64]) -> Result<(), ModelError> {
        if initial_reactant_amounts.len() != self.n_reactants() {
            return Err(ModelError::LengthMismatch {
                expected: self.n_reactants(),
                found: initial_reactant_amounts.len(),
            });
        }
        for (index, &value) in initial_reactant_amounts.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::InvalidAmount { index, value });
            }
        }
        for (index, &c) in self.reactant_coefficients().iter().enumerate() {
            if c == 0.0 {
                return Err(ModelError::ZeroCoefficient {
                    species: self.equation.reactants()[index].to_string(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// min over reactants of amount / coefficient: the largest extent the scarcest reactant allows
    pub fn limiting_ratio(&self, reactant_amounts: &[f64]) -> Result<f64, ModelError> {
        min_ratio(
            reactant_amounts,
            self.reactant_coefficients(),
            |i| self.equation.reactants()[i].to_string(),
            0,
        )
        .ok_or(ModelError::NoReactants)?
    }

    /// min over products of amount / coefficient, 0 when there are no products
    pub fn product_ratio(&self, product_amounts: &[f64]) -> Result<f64, ModelError> {
        min_ratio(
            product_amounts,
            self.product_coefficients(),
            |j| self.equation.products()[j].to_string(),
            self.n_reactants(),
        )
        .unwrap_or(Ok(0.0))
    }

    /// runs one of the three models over the grid 0, step, ... < max_time
    pub fn simulate(
        &self,
        kind: ModelKind,
        initial_reactant_amounts: &[f64],
        step_size: f64,
        max_time: f64,
    ) -> Result<Trajectory, ModelError> {
        let grid = TimeGrid::new(step_size, max_time)?;
        kind.create().simulate(self, initial_reactant_amounts, &grid)
    }

    pub fn calculate_linear_model(
        &self,
        initial_reactant_amounts: &[f64],
        step_size: f64,
        max_time: f64,
    ) -> Result<Trajectory, ModelError> {
        let grid = TimeGrid::new(step_size, max_time)?;
        LinearModel.simulate(self, initial_reactant_amounts, &grid)
    }

    pub fn calculate_simple_exponential_model(
        &self,
        initial_reactant_amounts: &[f64],
        step_size: f64,
        max_time: f64,
    ) -> Result<Trajectory, ModelError> {
        let grid = TimeGrid::new(step_size, max_time)?;
        SimpleExponentialModel.simulate(self, initial_reactant_amounts, &grid)
    }

    pub fn calculate_equilibrium_model(
        &self,
        initial_reactant_amounts: &[f64],
        step_size: f64,
        max_time: f64,
    ) -> Result<Trajectory, ModelError> {
        let grid = TimeGrid::new(step_size, max_time)?;
        EquilibriumModel.simulate(self, initial_reactant_amounts, &grid)
    }
}

// None for empty input, index_offset places products after reactants in error reports
fn min_ratio(
    amounts: &[f64],
    coefficients: &[f64],
    name: impl Fn(usize) -> String,
    index_offset: usize,
) -> Option<Result<f64, ModelError>> {
    if amounts.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    for (i, (&amount, &c)) in amounts.iter().zip(coefficients.iter()).enumerate() {
        if c == 0.0 {
            return Some(Err(ModelError::ZeroCoefficient {
                species: name(i),
                index: i + index_offset,
            }));
        }
        min = min.min(amount / c);
    }
    Some(Ok(min))
}
