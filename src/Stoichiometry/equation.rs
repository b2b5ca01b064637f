use super::balancer::{BalanceError, BalancerConfig, balance_with_config};
use super::species::{FormulaError, Species};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// tolerance of the element conservation check
pub const CONSERVATION_TOLERANCE: f64 = 1e-6;
/// accepted separators between the sides of an equation, longest first
const SIDE_SEPARATORS: [&str; 4] = ["<=>", "=>", "->", "="];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EquationError {
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error("equation '{0}' must have reactants and products separated by '=', '->', '=>' or '<=>'")]
    MissingSide(String),
    #[error("equation has no coefficients, call balance() first")]
    NotBalanced,
    #[error("expected {expected} coefficients, found {found}")]
    CoefficientCount { expected: usize, found: usize },
}

/// Chemical equation: two ordered lists of species and, after balancing,
/// one coefficient per species in the same order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Equation {
    reactants: Vec<Species>,
    products: Vec<Species>,
    reactant_coefficients: Vec<f64>,
    product_coefficients: Vec<f64>,
}

impl Equation {
    pub fn new() -> Self {
        Self::default()
    }

    /// build an equation from lists of formulae
    pub fn from_formulas(reactants: &[&str], products: &[&str]) -> Result<Self, FormulaError> {
        let mut equation = Equation::new();
        for formula in reactants {
            equation.add_reactant(formula)?;
        }
        for formula in products {
            equation.add_product(formula)?;
        }
        Ok(equation)
    }

    pub fn add_reactant(&mut self, formula: &str) -> Result<(), FormulaError> {
        self.reactants.push(Species::parse(formula)?);
        Ok(())
    }

    pub fn add_product(&mut self, formula: &str) -> Result<(), FormulaError> {
        self.products.push(Species::parse(formula)?);
        Ok(())
    }

    pub fn reactants(&self) -> &[Species] {
        &self.reactants
    }

    pub fn products(&self) -> &[Species] {
        &self.products
    }

    pub fn reactant_coefficients(&self) -> &[f64] {
        &self.reactant_coefficients
    }

    pub fn product_coefficients(&self) -> &[f64] {
        &self.product_coefficients
    }

    pub fn is_balanced(&self) -> bool {
        !self.reactant_coefficients.is_empty()
            && self.reactant_coefficients.len() == self.reactants.len()
            && self.product_coefficients.len() == self.products.len()
    }

    /// canonical formulae of reactants followed by products
    pub fn labels(&self) -> Vec<String> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|s| s.formula_canonical().to_string())
            .collect()
    }

    pub fn balance(&mut self) -> Result<(), BalanceError> {
        self.balance_with_config(&BalancerConfig::default())
    }

    /// computes coefficients, re-balancing overwrites the previous ones
    pub fn balance_with_config(&mut self, config: &BalancerConfig) -> Result<(), BalanceError> {
        let (reactant_coefficients, product_coefficients) =
            balance_with_config(&self.reactants, &self.products, config)?;
        self.reactant_coefficients = reactant_coefficients;
        self.product_coefficients = product_coefficients;
        Ok(())
    }

    /// sets coefficients directly, e.g. for kinetics of an already balanced equation
    pub fn set_coefficients(
        &mut self,
        reactant_coefficients: Vec<f64>,
        product_coefficients: Vec<f64>,
    ) -> Result<(), EquationError> {
        if reactant_coefficients.len() != self.reactants.len() {
            return Err(EquationError::CoefficientCount {
                expected: self.reactants.len(),
                found: reactant_coefficients.len(),
            });
        }
        if product_coefficients.len() != self.products.len() {
            return Err(EquationError::CoefficientCount {
                expected: self.products.len(),
                found: product_coefficients.len(),
            });
        }
        self.reactant_coefficients = reactant_coefficients;
        self.product_coefficients = product_coefficients;
        Ok(())
    }

    /// sum(coefficient * count) over reactants minus the same over products, per element
    pub fn element_residuals(&self) -> Result<BTreeMap<String, f64>, EquationError> {
        if !self.is_balanced() {
            return Err(EquationError::NotBalanced);
        }
        let mut residuals: BTreeMap<String, f64> = BTreeMap::new();
        let reactants = self.reactants.iter().zip(self.reactant_coefficients.iter());
        for (species, coefficient) in reactants {
            for (element, count) in species.element_counts() {
                *residuals.entry(element.clone()).or_insert(0.0) += coefficient * *count as f64;
            }
        }
        let products = self.products.iter().zip(self.product_coefficients.iter());
        for (species, coefficient) in products {
            for (element, count) in species.element_counts() {
                *residuals.entry(element.clone()).or_insert(0.0) -= coefficient * *count as f64;
            }
        }
        Ok(residuals)
    }

    /// true if every element is conserved within the tolerance
    pub fn conserves_elements(&self, tolerance: f64) -> bool {
        match self.element_residuals() {
            Ok(residuals) => residuals.values().all(|r| r.abs() <= tolerance),
            Err(_) => false,
        }
    }
}

/// parses "2H2 + O2 = 2H2O"; leading numeric coefficients are dropped since balance() recomputes them
impl FromStr for Equation {
    type Err = EquationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (left, right) = SIDE_SEPARATORS
            .iter()
            .find_map(|sep| s.split_once(sep))
            .ok_or_else(|| EquationError::MissingSide(s.to_string()))?;
        let mut equation = Equation::new();
        for term in split_side(left) {
            equation.add_reactant(term)?;
        }
        for term in split_side(right) {
            equation.add_product(term)?;
        }
        if equation.reactants.is_empty() || equation.products.is_empty() {
            return Err(EquationError::MissingSide(s.to_string()));
        }
        Ok(equation)
    }
}

fn split_side(side: &str) -> impl Iterator<Item = &str> {
    side.split('+')
        .map(|t| t.trim().trim_start_matches(|c: char| c.is_ascii_digit() || c == '.').trim())
        .filter(|t| !t.is_empty())
}

fn format_coefficient(coefficient: f64) -> String {
    // f64 Display gives the shortest form: 2 instead of 2.0, 0.5 stays 0.5
    format!("{}", coefficient)
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |species: &[Species], coefficients: &[f64]| -> String {
            species
                .iter()
                .enumerate()
                .map(|(i, s)| match coefficients.get(i) {
                    Some(&c) if c != 1.0 => format!("{} {}", format_coefficient(c), s),
                    _ => s.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" + ")
        };
        let (rc, pc): (&[f64], &[f64]) = if self.is_balanced() {
            (&self.reactant_coefficients, &self.product_coefficients)
        } else {
            (&[], &[])
        };
        write!(
            f,
            "{} = {}",
            side(&self.reactants, rc),
            side(&self.products, pc)
        )
    }
}
