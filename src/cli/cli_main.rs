use super::cli_examples::{examples_command, examples_menu};
use super::cli_task::{balance_command, balance_menu, run_task_file, task_menu};
use crate::Kinetics::reaction_model::ModelError;
use crate::Stoichiometry::balancer::BalanceError;
use crate::Stoichiometry::equation::EquationError;
use crate::Utils::load_from_file::TaskError;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("input/output error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Equation(#[from] EquationError),
    #[error(transparent)]
    Balance(#[from] BalanceError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("{0}")]
    Usage(String),
}

const USAGE: &str = "usage:
    ReactSim balance \"<equation>\" [--verbose]
    ReactSim run <task.json>
    ReactSim examples [n]
    ReactSim            (interactive menu)";

/// Dispatches command line arguments (without the program name).
pub fn run_cli(args: &[String]) -> Result<(), CliError> {
    let Some(command) = args.first() else {
        return run_interactive_menu();
    };
    match command.as_str() {
        "balance" => {
            let verbose = args[1..].iter().any(|a| a == "--verbose" || a == "-v");
            let text: Vec<&str> = args[1..]
                .iter()
                .filter(|a| *a != "--verbose" && *a != "-v")
                .map(|a| a.as_str())
                .collect();
            if text.is_empty() {
                return Err(CliError::Usage(USAGE.to_string()));
            }
            balance_command(&text.join(" "), verbose)?;
        }
        "run" => {
            let path = args
                .get(1)
                .ok_or_else(|| CliError::Usage(USAGE.to_string()))?;
            run_task_file(path)?;
        }
        "examples" => examples_command(args.get(1).map(|s| s.as_str()))?,
        "help" | "--help" | "-h" => println!("{}", USAGE),
        other => {
            return Err(CliError::Usage(format!(
                "unknown command '{}'\n{}",
                other, USAGE
            )));
        }
    }
    Ok(())
}

pub fn run_interactive_menu() -> Result<(), CliError> {
    loop {
        show_main_menu()?;
        let choice = get_user_input()?;
        let result = match choice.trim() {
            "1" => balance_menu(),
            "2" => task_menu(),
            "3" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };
        // a failed action returns to the menu
        if let Err(e) = result {
            println!("\x1b[31mError: {}\x1b[0m", e);
        }
    }
    Ok(())
}

/* colors
Blue (\x1b[34m) - Welcome header text
Yellow (\x1b[33m) - Menu options
Cyan (\x1b[36m) - "Enter your choice:" prompt
Red (\x1b[31m) - errors
Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() -> Result<(), CliError> {
    println!(
        "\x1b[34m\n ReactSim: balancing of chemical equations and simple reaction kinetics\n \x1b[0m"
    );
    println!("\x1b[33m1. Balance equation\x1b[0m");
    println!("\x1b[33m2. Kinetic simulation\x1b[0m");
    println!("\x1b[33m3. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush()?;
    Ok(())
}

pub(crate) fn get_user_input() -> Result<String, CliError> {
    let mut input = String::new();
    let bytes = io::stdin().read_line(&mut input)?;
    if bytes == 0 {
        return Err(CliError::Usage("end of input".to_string()));
    }
    Ok(input)
}

pub(crate) fn prompt(message: &str) -> Result<String, CliError> {
    print!("{}", message);
    io::stdout().flush()?;
    get_user_input()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_balance_from_args() {
        run_cli(&args(&["balance", "H2 + O2 = H2O"])).unwrap();
        run_cli(&args(&["balance", "--verbose", "Fe2O3", "+", "CO", "=", "Fe", "+", "CO2"])).unwrap();
        assert!(matches!(
            run_cli(&args(&["balance"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            run_cli(&args(&["balance", "C + HN = C"])),
            Err(CliError::Balance(BalanceError::DegenerateMatrix { .. }))
        ));
    }

    #[test]
    fn test_run_errors() {
        assert!(matches!(run_cli(&args(&["run"])), Err(CliError::Usage(_))));
        assert!(matches!(
            run_cli(&args(&["run", "no/such/task.json"])),
            Err(CliError::Task(TaskError::Io(_)))
        ));
    }

    #[test]
    fn test_unknown_command() {
        match run_cli(&args(&["simulate"])) {
            Err(CliError::Usage(msg)) => assert!(msg.contains("simulate")),
            other => panic!("expected usage error, got {:?}", other),
        }
        run_cli(&args(&["help"])).unwrap();
    }
}
