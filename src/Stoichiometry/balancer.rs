//! # Stoichiometric balancer
//!
//! ## Aim
//! Finds one coefficient per reagent so that every chemical element is conserved.
//!
//! ## Main Data Structures and Logic
//! - `ConservationSystem`: signed element x reagent matrix `A`. Entry (i, j) is the number
//!   of atoms of element i in reagent j, negated for products. A balanced equation is a
//!   non-trivial vector `c` with `A c = 0`.
//! - `ReducedSystem`: square subsystem `A' x = b` left after some leading reagents are fixed
//!   at coefficient 1 ("free" reagents) and some leading element rows are dropped. Active rows
//!   and columns are kept as explicit index sets, the full matrix is never mutated.
//!
//! ## Reduction
//! 1) With R reagents and E elements the first F = R - E reagents are free.
//! 2) More elements than reagents: leading element rows are dropped until the system is square.
//! 3) While the square subsystem is singular the first remaining row and column are dropped,
//!    so one more reagent becomes free. Running out of rows is an error.
//! 4) `b` is minus the sum of the free columns restricted to the active rows.
//!
//! ## Post-processing
//! All-zero solution is replaced with all ones (kept as a silent fallback, reported in
//! `BalanceOutcome::fallback_used`). Optional scaling by the smallest integer multiplier that
//! makes all coefficients integral, then rounding to 2 decimal places.
use super::species::Species;
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use std::collections::HashSet;
use thiserror::Error;

/// |det| below this value means the subsystem is singular. Entries are integers so a
/// non-singular determinant is at least 1 in magnitude.
pub const SINGULARITY_TOLERANCE: f64 = 1e-9;
const INTEGER_TOLERANCE: f64 = 1e-6;
const RESIDUAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BalanceError {
    #[error("no reagents to balance")]
    NoReagents,
    #[error("no chemical elements found in reagents")]
    NoElements,
    #[error("conservation matrix is degenerate: all {rows} element rows dropped without a non-singular core")]
    DegenerateMatrix { rows: usize },
    #[error("linear solve failed: {0}")]
    SolverFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalancerConfig {
    /// multiply by the smallest integer making all coefficients integral
    pub integer_scaling: bool,
    /// largest multiplier tried by integer scaling
    pub max_multiplier: u32,
    /// dump matrices and report the fallback at warn level
    pub verbose: bool,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            integer_scaling: true,
            max_multiplier: 12,
            verbose: false,
        }
    }
}

/// Signed element x reagent conservation matrix
#[derive(Debug, Clone)]
pub struct ConservationSystem {
    pub elements: Vec<String>,
    pub matrix: DMatrix<f64>,
    pub n_reactants: usize,
}

impl ConservationSystem {
    pub fn new(reactants: &[Species], products: &[Species]) -> Result<Self, BalanceError> {
        let reagents: Vec<&Species> = reactants.iter().chain(products.iter()).collect();
        if reagents.is_empty() {
            return Err(BalanceError::NoReagents);
        }
        // order of first appearance keeps the run deterministic
        let mut seen = HashSet::new();
        let mut elements = Vec::new();
        for reagent in reagents.iter() {
            for element in reagent.elements() {
                if seen.insert(element.to_string()) {
                    elements.push(element.to_string());
                }
            }
        }
        if elements.is_empty() {
            return Err(BalanceError::NoElements);
        }
        let n_reactants = reactants.len();
        let matrix = DMatrix::from_fn(elements.len(), reagents.len(), |i, j| {
            let count = reagents[j].count_of(&elements[i]) as f64;
            if j < n_reactants { count } else { -count }
        });
        Ok(Self {
            elements,
            matrix,
            n_reactants,
        })
    }

    pub fn n_elements(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_reagents(&self) -> usize {
        self.matrix.ncols()
    }

    /// reduce to a non-singular square system
    pub fn reduce(&self) -> Result<ReducedSystem, BalanceError> {
        let n_elements = self.n_elements();
        let n_reagents = self.n_reagents();
        let free = n_reagents.saturating_sub(n_elements);
        let mut rows: Vec<usize> = (0..n_elements).collect();
        let mut cols: Vec<usize> = (free..n_reagents).collect();
        let mut dropped_rows = Vec::new();

        if rows.len() > cols.len() {
            let surplus = rows.len() - cols.len();
            warn!(
                "{} elements for {} reagents, dropping {} leading element rows",
                n_elements, n_reagents, surplus
            );
            dropped_rows.extend(rows.drain(..surplus));
        }

        loop {
            let square = self.submatrix(&rows, &cols);
            if !rows.is_empty() && square.determinant().abs() >= SINGULARITY_TOLERANCE {
                let target = self.target(&rows, &cols);
                return Ok(ReducedSystem {
                    rows,
                    cols,
                    dropped_rows,
                    matrix: square,
                    target,
                });
            }
            if rows.len() <= 1 {
                return Err(BalanceError::DegenerateMatrix { rows: n_elements });
            }
            debug!(
                "singular subsystem of size {}, freeing reagent {} and dropping element {}",
                rows.len(),
                cols[0],
                self.elements[rows[0]]
            );
            dropped_rows.push(rows.remove(0));
            cols.remove(0);
        }
    }

    fn submatrix(&self, rows: &[usize], cols: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(rows.len(), cols.len(), |r, c| self.matrix[(rows[r], cols[c])])
    }

    /// minus the contribution of the free reagents (all columns outside `cols`), each at coefficient 1
    fn target(&self, rows: &[usize], cols: &[usize]) -> DVector<f64> {
        DVector::from_fn(rows.len(), |r, _| {
            -(0..self.n_reagents())
                .filter(|j| !cols.contains(j))
                .map(|j| self.matrix[(rows[r], j)])
                .sum::<f64>()
        })
    }
}

/// Square system A' x = b over the active element rows and reagent columns
#[derive(Debug, Clone)]
pub struct ReducedSystem {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub dropped_rows: Vec<usize>,
    pub matrix: DMatrix<f64>,
    pub target: DVector<f64>,
}

impl ReducedSystem {
    pub fn solve(&self) -> Result<DVector<f64>, BalanceError> {
        let inverse = self.matrix.clone().try_inverse().ok_or_else(|| {
            BalanceError::SolverFailed(format!("matrix is not invertible:{}", self.matrix))
        })?;
        Ok(inverse * &self.target)
    }
}

/// result of a balancing run with its diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceOutcome {
    pub reactant_coefficients: Vec<f64>,
    pub product_coefficients: Vec<f64>,
    /// reagents fixed at coefficient 1 before scaling
    pub free_reagents: usize,
    /// element symbols whose conservation rows were dropped
    pub dropped_elements: Vec<String>,
    /// true if the trivial solution was replaced with all ones
    pub fallback_used: bool,
    /// true if some coefficient came out negative, the species is on the wrong side
    pub negative_coefficients: bool,
    pub multiplier: u32,
}

pub fn balance(
    reactants: &[Species],
    products: &[Species],
) -> Result<(Vec<f64>, Vec<f64>), BalanceError> {
    balance_with_config(reactants, products, &BalancerConfig::default())
}

pub fn balance_with_config(
    reactants: &[Species],
    products: &[Species],
    config: &BalancerConfig,
) -> Result<(Vec<f64>, Vec<f64>), BalanceError> {
    let outcome = balance_detailed(reactants, products, config)?;
    Ok((outcome.reactant_coefficients, outcome.product_coefficients))
}

pub fn balance_detailed(
    reactants: &[Species],
    products: &[Species],
    config: &BalancerConfig,
) -> Result<BalanceOutcome, BalanceError> {
    info!(
        "balancing {} reactants against {} products",
        reactants.len(),
        products.len()
    );
    let system = ConservationSystem::new(reactants, products)?;
    if config.verbose {
        debug!("elements: {:?}", system.elements);
        debug!("A = {}", system.matrix);
    }
    let reduced = system.reduce()?;
    if config.verbose {
        debug!("reduced A = {}", reduced.matrix);
        debug!("b = {}", reduced.target.transpose());
    }
    let solution = reduced.solve()?;

    let mut coefficients = vec![1.0; system.n_reagents()];
    for (k, &j) in reduced.cols.iter().enumerate() {
        coefficients[j] = solution[k];
    }

    let fallback_used = coefficients.iter().all(|&c| c == 0.0);
    if fallback_used {
        let msg = "balancing gave the trivial solution, falling back to all coefficients equal to 1";
        if config.verbose {
            warn!("{}", msg);
        } else {
            debug!("{}", msg);
        }
        coefficients = vec![1.0; system.n_reagents()];
    }

    let residual = &system.matrix * DVector::from_column_slice(&coefficients);
    for (i, r) in residual.iter().enumerate() {
        if r.abs() > RESIDUAL_TOLERANCE {
            warn!(
                "element {} is not conserved, residual {}",
                system.elements[i], r
            );
        }
    }

    let multiplier = if config.integer_scaling {
        smallest_integer_multiplier(&coefficients, config.max_multiplier).unwrap_or(1)
    } else {
        1
    };
    let coefficients: Vec<f64> = coefficients
        .iter()
        .map(|c| round_to_hundredths(c * multiplier as f64))
        .collect();

    let negative_coefficients = coefficients.iter().any(|&c| c < 0.0);
    if negative_coefficients {
        warn!(
            "negative coefficients {:?}: some species belong on the other side of the equation",
            coefficients
        );
    }

    let (reactant_coefficients, product_coefficients) = coefficients.split_at(system.n_reactants);
    let outcome = BalanceOutcome {
        reactant_coefficients: reactant_coefficients.to_vec(),
        product_coefficients: product_coefficients.to_vec(),
        free_reagents: system.n_reagents() - reduced.cols.len(),
        dropped_elements: reduced
            .dropped_rows
            .iter()
            .map(|&i| system.elements[i].clone())
            .collect(),
        fallback_used,
        negative_coefficients,
        multiplier,
    };
    info!(
        "balanced coefficients: {:?} = {:?}",
        outcome.reactant_coefficients, outcome.product_coefficients
    );
    Ok(outcome)
}

/// smallest m in 1..=max_multiplier with every c * m integral
pub fn smallest_integer_multiplier(coefficients: &[f64], max_multiplier: u32) -> Option<u32> {
    (1..=max_multiplier).find(|&m| {
        coefficients.iter().all(|c| {
            let scaled = c * m as f64;
            (scaled - scaled.round()).abs() < INTEGER_TOLERANCE
        })
    })
}

fn round_to_hundredths(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // no negative zero in the output
    if rounded == 0.0 { 0.0 } else { rounded }
}
