//! # ReactSim
//!
//! Balancing of chemical equations and three simple kinetic models of a single reaction.
//!
//! - `Stoichiometry`: parsing of chemical formulae and equations, element balance by a linear
//!   system solved with nalgebra
//! - `Kinetics`: linear, simple exponential and equilibrium models producing a `Trajectory`
//! - `Utils`: JSON task files and logger setup
//! - `cli`: command line and interactive menu
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Stoichiometry;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
