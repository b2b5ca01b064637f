use super::cli_main::{CliError, prompt};
use crate::Kinetics::kinetic_models::ModelKind;
use crate::Stoichiometry::balancer::{BalancerConfig, balance_detailed};
use crate::Stoichiometry::equation::Equation;
use crate::Utils::load_from_file::{ReactionTask, SimulationReport, load_task};
use log::info;

/// Parses and balances `text`, prints the balanced equation.
pub fn balance_command(text: &str, verbose: bool) -> Result<Equation, CliError> {
    let mut equation: Equation = text.parse()?;
    let config = BalancerConfig {
        verbose,
        ..BalancerConfig::default()
    };
    if verbose {
        let outcome = balance_detailed(equation.reactants(), equation.products(), &config)?;
        println!(
            "free reagents: {}, dropped elements: {:?}, multiplier: {}, fallback: {}, negative: {}",
            outcome.free_reagents,
            outcome.dropped_elements,
            outcome.multiplier,
            outcome.fallback_used,
            outcome.negative_coefficients
        );
    }
    equation.balance_with_config(&config)?;
    println!("{}", equation);
    Ok(equation)
}

/// Loads a task file, runs it and prints the result.
pub fn run_task_file(path: &str) -> Result<SimulationReport, CliError> {
    let task = load_task(path)?;
    info!("running task from {}", path);
    let report = task.run()?;
    report.pretty_print(print_every(report.trajectory.n_points()));
    if let Some(output) = &task.output {
        println!("Trajectory written to {}", output);
    }
    Ok(report)
}

// about 20 rows in the printed table
fn print_every(n_points: usize) -> usize {
    (n_points / 20).max(1)
}

pub fn balance_menu() -> Result<(), CliError> {
    let text = prompt("Enter equation (e.g. H2 + O2 = H2O): ")?;
    let verbose = prompt("Show balancing details? (y/n): ")?;
    balance_command(text.trim(), verbose.trim().eq_ignore_ascii_case("y"))?;
    Ok(())
}

pub fn task_menu() -> Result<(), CliError> {
    println!("\n=== Kinetic simulation ===");
    println!("1. Load task file");
    println!("2. Enter task manually");
    println!("0. Back to main menu");
    let choice = prompt("Choose option: ")?;
    match choice.trim() {
        "1" => {
            let path = prompt("Path to task file: ")?;
            run_task_file(path.trim())?;
        }
        "2" => {
            let task = input_task()?;
            let report = task.run()?;
            report.pretty_print(print_every(report.trajectory.n_points()));
        }
        "0" => {}
        _ => println!("Invalid option"),
    }
    Ok(())
}

fn input_task() -> Result<ReactionTask, CliError> {
    let equation = prompt("Equation: ")?;
    let forward_rate = parse_number(&prompt("Forward rate constant: ")?)?;
    let reverse = prompt("Reverse rate constant (empty for 0): ")?;
    let reverse_rate = if reverse.trim().is_empty() {
        0.0
    } else {
        parse_number(&reverse)?
    };
    let amounts = prompt("Initial amounts of reactants, separated by spaces: ")?;
    let initial_amounts = amounts
        .split_whitespace()
        .map(parse_number)
        .collect::<Result<Vec<f64>, CliError>>()?;
    let step_size = parse_number(&prompt("Time step: ")?)?;
    let max_time = parse_number(&prompt("Final time: ")?)?;
    println!("Models: {:?}", ModelKind::all().map(|kind| kind.to_string()));
    let model_name = prompt("Model (empty for equilibrium): ")?;
    let model = if model_name.trim().is_empty() {
        ModelKind::default()
    } else {
        model_name.parse::<ModelKind>()?
    };
    let output = prompt("Output file (.csv or .json, empty for none): ")?;
    let output = Some(output.trim().to_string()).filter(|o| !o.is_empty());
    Ok(ReactionTask {
        equation: Some(equation.trim().to_string()),
        reactants: Vec::new(),
        products: Vec::new(),
        forward_rate,
        reverse_rate,
        initial_amounts,
        step_size,
        max_time,
        model,
        integer_scaling: true,
        verbose: false,
        output,
    })
}

fn parse_number(input: &str) -> Result<f64, CliError> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| CliError::Usage(format!("'{}' is not a number", input.trim())))
}
