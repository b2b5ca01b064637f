use super::reaction_model::{ModelError, ReactionModel, TimeGrid};
use super::trajectory::Trajectory;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use super::equilibrium_model::{EquilibriumModel, EquilibriumState};
pub use super::exponential_model::SimpleExponentialModel;
pub use super::linear_model::LinearModel;

/// Common interface of the kinetic models. A model turns a balanced reaction, the initial
/// amounts of reactants and a time grid into amount trajectories of all species.
#[enum_dispatch]
pub trait KineticModel {
    fn name(&self) -> &'static str;
    fn simulate(
        &self,
        reaction: &ReactionModel,
        initial_reactant_amounts: &[f64],
        grid: &TimeGrid,
    ) -> Result<Trajectory, ModelError>;
}

#[derive(Debug, Clone)]
#[enum_dispatch(KineticModel)]
pub enum KineticModelEnum {
    Linear(LinearModel),
    SimpleExponential(SimpleExponentialModel),
    Equilibrium(EquilibriumModel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Linear,
    #[serde(alias = "simple_exponential")]
    Exponential,
    #[default]
    Equilibrium,
}

impl ModelKind {
    pub fn create(self) -> KineticModelEnum {
        match self {
            ModelKind::Linear => KineticModelEnum::Linear(LinearModel),
            ModelKind::Exponential => KineticModelEnum::SimpleExponential(SimpleExponentialModel),
            ModelKind::Equilibrium => KineticModelEnum::Equilibrium(EquilibriumModel),
        }
    }

    pub fn all() -> [ModelKind; 3] {
        [ModelKind::Linear, ModelKind::Exponential, ModelKind::Equilibrium]
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(ModelKind::Linear),
            "exponential" | "simple_exponential" | "exp" => Ok(ModelKind::Exponential),
            "equilibrium" | "reversible" => Ok(ModelKind::Equilibrium),
            _ => Err(ModelError::UnknownModel(s.to_string())),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.create().name())
    }
}

pub fn create_model_by_name(name: &str) -> Result<KineticModelEnum, ModelError> {
    Ok(name.parse::<ModelKind>()?.create())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_by_name() {
        assert_eq!(create_model_by_name("linear").unwrap().name(), "linear");
        assert_eq!(create_model_by_name("Exponential").unwrap().name(), "exponential");
        assert_eq!(create_model_by_name(" equilibrium ").unwrap().name(), "equilibrium");
        assert_eq!(
            create_model_by_name("arrhenius").unwrap_err(),
            ModelError::UnknownModel("arrhenius".to_string())
        );
    }

    #[test]
    fn test_model_kind_serde() {
        let kind: ModelKind = serde_json::from_str("\"exponential\"").unwrap();
        assert_eq!(kind, ModelKind::Exponential);
        let kind: ModelKind = serde_json::from_str("\"simple_exponential\"").unwrap();
        assert_eq!(kind, ModelKind::Exponential);
        assert_eq!(serde_json::to_string(&ModelKind::Linear).unwrap(), "\"linear\"");
        assert_eq!(ModelKind::default(), ModelKind::Equilibrium);
        assert_eq!(ModelKind::Equilibrium.to_string(), "equilibrium");
    }
}
