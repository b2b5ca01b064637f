/// Module to parse a chemical formula into its atomic composition and a canonical display string
///
///  # Examples
/// ```
/// use ReactSim::Stoichiometry::species::Species;
/// let nitrate = Species::parse("Ca(NO3)2").unwrap();
/// assert_eq!(nitrate.count_of("O"), 6);
/// assert_eq!(nitrate.formula_canonical(), "Ca(NO3)2");
/// ```
pub mod species;
/// Chemical equation: ordered reactants and products, coefficients after balancing,
/// parsing from text like "H2 + O2 = H2O" and rendering like "2 H2 + O2 = 2 H2O"
///
///  # Examples
/// ```
/// use ReactSim::Stoichiometry::equation::Equation;
/// let mut equation: Equation = "H2 + O2 = H2O".parse().unwrap();
/// equation.balance().unwrap();
/// assert_eq!(equation.to_string(), "2 H2 + O2 = 2 H2O");
/// ```
pub mod equation;
/// eng
/// Balancing of chemical equations. The module builds the signed matrix of element conservation
/// (element x reagent, products with negative sign), fixes the extra degrees of freedom at 1 and
/// solves the remaining square system. Rank-deficient systems are reduced step by step by freeing
/// one more reagent and dropping one element row until a non-singular core remains.
pub mod balancer;
