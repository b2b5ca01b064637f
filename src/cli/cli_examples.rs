use super::cli_main::{CliError, prompt};
use crate::Examples::reaction_examples::{N_EXAMPLES, reaction_examples};

/// Runs example `n`, or all of them when `n` is not given.
pub fn examples_command(n: Option<&str>) -> Result<(), CliError> {
    match n {
        None => (0..N_EXAMPLES).for_each(reaction_examples),
        Some(n) => {
            let task = n
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|task| *task < N_EXAMPLES)
                .ok_or_else(|| {
                    CliError::Usage(format!(
                        "example number must be 0..{}, got '{}'",
                        N_EXAMPLES - 1,
                        n
                    ))
                })?;
            reaction_examples(task);
        }
    }
    Ok(())
}

pub fn examples_menu() -> Result<(), CliError> {
    loop {
        println!("\n=== Examples ===");
        println!("1. Parsing formulae");
        println!("2. Balancing equations");
        println!("3. Details of balancing");
        println!("4. Kinetic models for A = B");
        println!("5. Water formation, equilibrium model");
        println!("6. Methane combustion, JSON output");
        println!("0. Back to main menu");
        let choice = prompt("Enter your choice: ")?;
        match choice.trim() {
            "0" => break,
            n => match n.parse::<usize>() {
                Ok(task) if (1..=N_EXAMPLES).contains(&task) => reaction_examples(task - 1),
                _ => println!("Invalid choice. Please try again."),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_command() {
        examples_command(Some("1")).unwrap();
        assert!(matches!(
            examples_command(Some("42")),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            examples_command(Some("one")),
            Err(CliError::Usage(_))
        ));
    }
}
