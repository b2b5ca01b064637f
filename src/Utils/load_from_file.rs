//! # Reaction task files
//!
//! A task is a JSON object describing the equation, the rate constants, the initial amounts of
//! reactants, the time grid and the kinetic model. The file is either pure JSON or a text document
//! where the JSON follows a `TASK` (or `REACTION`) header line and runs until the next header
//! (a line of capital letters and underscores).
//!
//! ```json
//! {
//!   "reactants": ["H2", "O2"],
//!   "products": ["H2O"],
//!   "forward_rate": 1.0,
//!   "reverse_rate": 0.2,
//!   "initial_amounts": [2.0, 1.0],
//!   "step_size": 0.01,
//!   "max_time": 5.0,
//!   "model": "equilibrium",
//!   "output": "water.csv"
//! }
//! ```
//! Instead of `reactants`/`products` the equation can be given as text: `"equation": "H2 + O2 = H2O"`.
use crate::Kinetics::kinetic_models::ModelKind;
use crate::Kinetics::reaction_model::{ModelError, ReactionModel};
use crate::Kinetics::trajectory::Trajectory;
use crate::Stoichiometry::balancer::{BalanceError, BalancerConfig};
use crate::Stoichiometry::equation::{Equation, EquationError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("failed to read task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Equation(#[from] EquationError),
    #[error(transparent)]
    Balance(#[from] BalanceError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("task must define either 'equation' or both 'reactants' and 'products'")]
    MissingReagents,
}

fn default_step_size() -> f64 {
    0.01
}

fn default_max_time() -> f64 {
    1.0
}

fn default_integer_scaling() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionTask {
    #[serde(default)]
    pub equation: Option<String>,
    #[serde(default)]
    pub reactants: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    pub forward_rate: f64,
    #[serde(default)]
    pub reverse_rate: f64,
    pub initial_amounts: Vec<f64>,
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    #[serde(default = "default_max_time")]
    pub max_time: f64,
    #[serde(default)]
    pub model: ModelKind,
    #[serde(default = "default_integer_scaling")]
    pub integer_scaling: bool,
    #[serde(default)]
    pub verbose: bool,
    /// .json writes JSON, anything else CSV
    #[serde(default)]
    pub output: Option<String>,
}

/// balanced equation and the computed trajectory
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub equation: Equation,
    pub trajectory: Trajectory,
}

impl SimulationReport {
    pub fn pretty_print(&self, every: usize) {
        println!("\nBalanced equation: {}", self.equation);
        self.trajectory.pretty_print(every);
    }
}

impl ReactionTask {
    pub fn from_json_str(text: &str) -> Result<Self, TaskError> {
        serde_json::from_str(text).map_err(|e| {
            TaskError::Parse(format!(
                "error parsing task at line {}, column {}: {}",
                e.line(),
                e.column(),
                e
            ))
        })
    }

    /// unbalanced equation from `equation` text or from the formula lists
    pub fn equation(&self) -> Result<Equation, TaskError> {
        if let Some(text) = &self.equation {
            if !self.reactants.is_empty() || !self.products.is_empty() {
                warn!("task defines both 'equation' and formula lists, using 'equation'");
            }
            return Ok(text.parse::<Equation>()?);
        }
        if self.reactants.is_empty() || self.products.is_empty() {
            return Err(TaskError::MissingReagents);
        }
        let reactants: Vec<&str> = self.reactants.iter().map(|s| s.as_str()).collect();
        let products: Vec<&str> = self.products.iter().map(|s| s.as_str()).collect();
        Equation::from_formulas(&reactants, &products)
            .map_err(|e| TaskError::Equation(EquationError::Formula(e)))
    }

    pub fn balancer_config(&self) -> BalancerConfig {
        BalancerConfig {
            integer_scaling: self.integer_scaling,
            verbose: self.verbose,
            ..BalancerConfig::default()
        }
    }

    /// parse, balance, simulate and save the trajectory if `output` is set
    pub fn run(&self) -> Result<SimulationReport, TaskError> {
        let mut equation = self.equation()?;
        equation.balance_with_config(&self.balancer_config())?;
        info!("balanced equation: {}", equation);
        let reaction =
            ReactionModel::new(equation.clone(), self.forward_rate, Some(self.reverse_rate))?;
        let trajectory = reaction.simulate(
            self.model,
            &self.initial_amounts,
            self.step_size,
            self.max_time,
        )?;
        if let Some(output) = &self.output {
            if output.to_lowercase().ends_with(".json") {
                trajectory.save_json(output)?;
            } else {
                trajectory.save_csv(output)?;
            }
            info!("trajectory written to {}", output);
        }
        Ok(SimulationReport {
            equation,
            trajectory,
        })
    }
}

/// Reads a task from a JSON file or from the section under a TASK/REACTION header.
pub fn load_task<P: AsRef<Path>>(path: P) -> Result<ReactionTask, TaskError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let (section, first_line) = task_section(&text);
    let task: ReactionTask = serde_json::from_str(&section).map_err(|e| {
        TaskError::Parse(format!(
            "error parsing task at line {}, column {} (line {} in file '{}'): {}",
            e.line(),
            e.column(),
            first_line + e.line(),
            path.display(),
            e
        ))
    })?;
    info!("task loaded from '{}'", path.display());
    Ok(task)
}

// JSON text of the task and the number of lines before it
fn task_section(text: &str) -> (String, usize) {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|line| {
        let header = line.trim().to_uppercase();
        header == "TASK" || header == "REACTION"
    });
    match start {
        None => (text.to_string(), 0),
        Some(header) => {
            let start = header + 1;
            let end = lines[start..]
                .iter()
                .position(|line| is_header(line))
                .map(|offset| start + offset)
                .unwrap_or(lines.len());
            (lines[start..end].join("\n"), start)
        }
    }
}

fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WATER_TASK: &str = r#"{
        "reactants": ["H2", "O2"],
        "products": ["H2O"],
        "forward_rate": 1.0,
        "initial_amounts": [2.0, 1.0],
        "step_size": 0.5,
        "max_time": 2.0,
        "model": "linear"
    }"#;

    #[test]
    fn test_defaults() {
        let task = ReactionTask::from_json_str(
            r#"{"equation": "A = B", "forward_rate": 2.0, "initial_amounts": [1.0]}"#,
        )
        .unwrap();
        assert_eq!(task.reverse_rate, 0.0);
        assert_eq!(task.step_size, 0.01);
        assert_eq!(task.max_time, 1.0);
        assert_eq!(task.model, ModelKind::Equilibrium);
        assert!(task.integer_scaling);
        assert!(!task.verbose);
        assert_eq!(task.output, None);
    }

    #[test]
    fn test_run_task() {
        let task = ReactionTask::from_json_str(WATER_TASK).unwrap();
        let report = task.run().unwrap();
        assert_eq!(report.equation.to_string(), "2 H2 + O2 = 2 H2O");
        assert_eq!(report.trajectory.model, "linear");
        assert_eq!(report.trajectory.n_points(), 4);
        // H2 at t = 1.5: 2 - 2 * 1 * 1.5
        assert_relative_eq!(report.trajectory.reactant(0)[3], -1.0);
        report.pretty_print(1);
    }

    #[test]
    fn test_missing_reagents() {
        let task = ReactionTask::from_json_str(
            r#"{"reactants": ["H2"], "forward_rate": 1.0, "initial_amounts": [1.0]}"#,
        )
        .unwrap();
        assert!(matches!(task.run(), Err(TaskError::MissingReagents)));
    }

    #[test]
    fn test_errors_from_each_stage() {
        let mut task = ReactionTask::from_json_str(WATER_TASK).unwrap();
        task.reactants[0] = "h2".to_string();
        assert!(matches!(task.run(), Err(TaskError::Equation(_))));

        let mut task = ReactionTask::from_json_str(WATER_TASK).unwrap();
        task.initial_amounts = vec![1.0];
        assert!(matches!(
            task.run(),
            Err(TaskError::Model(ModelError::LengthMismatch { .. }))
        ));

        let mut task = ReactionTask::from_json_str(WATER_TASK).unwrap();
        task.reactants = vec!["C".to_string(), "HN".to_string()];
        task.products = vec!["C".to_string()];
        assert!(matches!(task.run(), Err(TaskError::Balance(_))));

        assert!(matches!(
            ReactionTask::from_json_str("{\"forward_rate\": }"),
            Err(TaskError::Parse(_))
        ));
    }

    #[test]
    fn test_load_plain_json_and_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("water.json");
        let mut task = ReactionTask::from_json_str(WATER_TASK).unwrap();
        task.output = Some(output.to_string_lossy().to_string());
        let task_path = dir.path().join("task.json");
        fs::write(&task_path, serde_json::to_string_pretty(&task).unwrap()).unwrap();

        let loaded = load_task(&task_path).unwrap();
        assert_eq!(loaded, task);
        loaded.run().unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["model"], "linear");
        assert_eq!(written["species"][2]["label"], "H2O");
    }

    #[test]
    fn test_load_task_under_header() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "some notes about the run").unwrap();
        writeln!(file, "TASK").unwrap();
        writeln!(file, "{}", WATER_TASK).unwrap();
        writeln!(file, "RESULTS").unwrap();
        writeln!(file, "not json").unwrap();
        let task = load_task(file.path()).unwrap();
        assert_eq!(task.reactants, vec!["H2", "O2"]);
        assert_eq!(task.model, ModelKind::Linear);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            load_task("definitely/not/here.json"),
            Err(TaskError::Io(_))
        ));
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TASK").unwrap();
        writeln!(file, "{{ \"reactants\": [\"H2\"],").unwrap();
        match load_task(file.path()) {
            Err(TaskError::Parse(msg)) => assert!(msg.contains("in file")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
