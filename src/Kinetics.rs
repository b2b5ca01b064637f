/// Balanced equation with forward and reverse rate constants, time grid, and the input checks
/// shared by all kinetic models
///
///  # Examples
/// ```
/// use ReactSim::Stoichiometry::equation::Equation;
/// use ReactSim::Kinetics::reaction_model::ReactionModel;
/// let mut equation: Equation = "A = B".parse().unwrap();
/// equation.set_coefficients(vec![1.0], vec![1.0]).unwrap();
/// let reaction = ReactionModel::new(equation, 1.0, None).unwrap();
/// let trajectory = reaction.calculate_linear_model(&[10.0], 1.0, 10.0).unwrap();
/// assert_eq!(trajectory.reactant(0)[5], 5.0);
/// assert_eq!(trajectory.product(0)[5], 5.0);
/// ```
pub mod reaction_model;
/// eng
/// Kinetic models share the trait KineticModel and are dispatched through KineticModelEnum:
/// 1) linear: amounts change linearly with time, not clamped
/// 2) exponential: irreversible first-order relaxation to full conversion of the limiting reactant
/// 3) equilibrium: step-wise relaxation towards targets recomputed from running ratios,
///    reversible when the reverse rate constant is positive
pub mod kinetic_models;
pub mod linear_model;
pub mod exponential_model;
/// Equilibrium model computed step by step with an explicit state accumulator
pub mod equilibrium_model;
/// Time series of amounts of all species: nalgebra matrix, tables, CSV and JSON output
pub mod trajectory;
mod kinetics_tests;
