use crate::Kinetics::kinetic_models::ModelKind;
use crate::Kinetics::reaction_model::ReactionModel;
use crate::Stoichiometry::balancer::{BalancerConfig, balance_detailed};
use crate::Stoichiometry::equation::Equation;
use crate::Stoichiometry::species::Species;
use crate::Utils::load_from_file::ReactionTask;

/// number of example scenarios accepted by `reaction_examples`
pub const N_EXAMPLES: usize = 6;

pub fn reaction_examples(task: usize) {
    match task {
        0 => {
            // PARSING FORMULAE
            for formula in ["H2O", "Ca(OH)2", "K4[Fe(CN)6]", "CH3COOH", "NaCl(aq)"] {
                match Species::parse(formula) {
                    Ok(species) => println!(
                        "{} -> {} {:?}",
                        formula,
                        species.formula_canonical(),
                        species.element_counts()
                    ),
                    Err(e) => println!("{}: {}", formula, e),
                }
            }
        }
        1 => {
            // BALANCING EQUATIONS
            let equations = [
                "H2 + O2 = H2O",
                "CH4 + O2 = CO2 + H2O",
                "C3H8 + O2 -> CO2 + H2O",
                "Fe2O3 + CO = Fe + CO2",
                "Ca(OH)2 + H3PO4 = Ca3(PO4)2 + H2O",
                "KMnO4 + HCl = KCl + MnCl2 + H2O + Cl2",
            ];
            for text in equations {
                let mut equation: Equation = match text.parse() {
                    Ok(equation) => equation,
                    Err(e) => {
                        println!("{}: {}", text, e);
                        continue;
                    }
                };
                match equation.balance() {
                    Ok(()) => println!("{:<40} => {}", text, equation),
                    Err(e) => println!("{:<40} => {}", text, e),
                }
            }
        }
        2 => {
            // DETAILS OF THE BALANCING PROCEDURE: free reagents, dropped elements, fallback
            let config = BalancerConfig {
                verbose: true,
                ..BalancerConfig::default()
            };
            for text in ["NO = N2O2", "C2H4 + CH2 = C3H6", "H2 = O2"] {
                let Ok(equation) = text.parse::<Equation>() else {
                    continue;
                };
                match balance_detailed(equation.reactants(), equation.products(), &config) {
                    Ok(outcome) => println!("{}: {:?}", text, outcome),
                    Err(e) => println!("{}: {}", text, e),
                }
            }
        }
        3 => {
            // THREE KINETIC MODELS FOR A = B
            let mut equation: Equation = match "A = B".parse() {
                Ok(equation) => equation,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            if let Err(e) = equation.balance() {
                println!("{}", e);
                return;
            }
            let reaction = match ReactionModel::new(equation, 1.0, Some(0.5)) {
                Ok(reaction) => reaction,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            for kind in ModelKind::all() {
                match reaction.simulate(kind, &[10.0], 0.5, 5.0) {
                    Ok(trajectory) => trajectory.pretty_print(2),
                    Err(e) => println!("{}: {}", kind, e),
                }
            }
        }
        4 => {
            // WATER FORMATION, REVERSIBLE EQUILIBRIUM MODEL
            let task = ReactionTask {
                equation: Some("H2 + O2 = H2O".to_string()),
                reactants: Vec::new(),
                products: Vec::new(),
                forward_rate: 1.0,
                reverse_rate: 0.2,
                initial_amounts: vec![2.0, 1.0],
                step_size: 0.1,
                max_time: 3.0,
                model: ModelKind::Equilibrium,
                integer_scaling: true,
                verbose: false,
                output: None,
            };
            match task.run() {
                Ok(report) => report.pretty_print(5),
                Err(e) => println!("{}", e),
            }
        }
        5 => {
            // METHANE COMBUSTION, TRAJECTORY AS JSON
            let task = ReactionTask {
                equation: None,
                reactants: vec!["CH4".to_string(), "O2".to_string()],
                products: vec!["CO2".to_string(), "H2O".to_string()],
                forward_rate: 0.8,
                reverse_rate: 0.0,
                initial_amounts: vec![1.0, 3.0],
                step_size: 0.5,
                max_time: 2.0,
                model: ModelKind::Exponential,
                integer_scaling: true,
                verbose: false,
                output: None,
            };
            match task.run() {
                Ok(report) => {
                    println!("{}", report.equation);
                    match serde_json::to_string_pretty(&report.trajectory.to_json()) {
                        Ok(json) => println!("{}", json),
                        Err(e) => println!("{}", e),
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        _ => println!("no example with number {}, choose 0..{}", task, N_EXAMPLES - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_examples_run() {
        for task in 0..=N_EXAMPLES {
            reaction_examples(task);
        }
    }
}
