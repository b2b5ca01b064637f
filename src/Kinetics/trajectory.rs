//! # Trajectory of a kinetic simulation
//!
//! Time grid in `t_result` and amounts in `y_result`, one row per time point and one column
//! per species (reactants first, then products, in equation order). Labels are the canonical
//! formulae of the species. Output: pretty table, CSV and JSON.
use nalgebra::{DMatrix, DVector};
use prettytable::{Cell, Row, Table};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub model: String,
    pub t_result: DVector<f64>,
    pub y_result: DMatrix<f64>,
    pub labels: Vec<String>,
    pub n_reactants: usize,
}

impl Trajectory {
    /// assembles the matrix from per-species series aligned to `time`
    pub fn from_series(
        model: &str,
        time: Vec<f64>,
        reactant_amounts: Vec<Vec<f64>>,
        product_amounts: Vec<Vec<f64>>,
        labels: Vec<String>,
    ) -> Self {
        let n_reactants = reactant_amounts.len();
        let columns: Vec<Vec<f64>> = reactant_amounts.into_iter().chain(product_amounts).collect();
        let y_result = DMatrix::from_fn(time.len(), columns.len(), |i, j| columns[j][i]);
        Self {
            model: model.to_string(),
            t_result: DVector::from_vec(time),
            y_result,
            labels,
            n_reactants,
        }
    }

    pub fn n_points(&self) -> usize {
        self.t_result.len()
    }

    pub fn n_products(&self) -> usize {
        self.y_result.ncols() - self.n_reactants
    }

    pub fn time(&self) -> &[f64] {
        self.t_result.as_slice()
    }

    pub fn reactant(&self, i: usize) -> Vec<f64> {
        self.y_result.column(i).iter().copied().collect()
    }

    pub fn product(&self, j: usize) -> Vec<f64> {
        self.y_result.column(self.n_reactants + j).iter().copied().collect()
    }

    pub fn reactant_amounts(&self) -> Vec<Vec<f64>> {
        (0..self.n_reactants).map(|i| self.reactant(i)).collect()
    }

    pub fn product_amounts(&self) -> Vec<Vec<f64>> {
        (0..self.n_products()).map(|j| self.product(j)).collect()
    }

    /// series of the species with the given label, first match
    pub fn species(&self, label: &str) -> Option<Vec<f64>> {
        let col = self.labels.iter().position(|l| l == label)?;
        Some(self.y_result.column(col).iter().copied().collect())
    }

    /// amounts of all species at the last time point
    pub fn final_amounts(&self) -> Vec<f64> {
        if self.n_points() == 0 {
            return Vec::new();
        }
        self.y_result.row(self.n_points() - 1).iter().copied().collect()
    }

    /// table with every `every`-th time point and the last one
    pub fn pretty_print(&self, every: usize) {
        let mut table = Table::new();
        let mut header = vec![Cell::new("t")];
        header.extend(self.labels.iter().map(|l| Cell::new(l)));
        table.add_row(Row::new(header));
        let every = every.max(1);
        for i in 0..self.n_points() {
            if i % every != 0 && i + 1 != self.n_points() {
                continue;
            }
            let mut row = vec![Cell::new(&format!("{:.4}", self.t_result[i]))];
            row.extend(
                self.y_result
                    .row(i)
                    .iter()
                    .map(|y| Cell::new(&format!("{:.6}", y))),
            );
            table.add_row(Row::new(row));
        }
        println!("\nModel: {}", self.model);
        table.printstd();
    }

    pub fn to_csv_string(&self) -> String {
        let mut csv = String::from("time");
        for label in &self.labels {
            csv.push(',');
            csv.push_str(label);
        }
        csv.push('\n');
        for i in 0..self.n_points() {
            csv.push_str(&self.t_result[i].to_string());
            for y in self.y_result.row(i).iter() {
                csv.push(',');
                csv.push_str(&y.to_string());
            }
            csv.push('\n');
        }
        csv
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let mut file = File::create(path)?;
        file.write_all(self.to_csv_string().as_bytes())?;
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Value {
        let species: Vec<serde_json::Value> = self
            .labels
            .iter()
            .enumerate()
            .map(|(j, label)| {
                let role = if j < self.n_reactants { "reactant" } else { "product" };
                let amounts: Vec<f64> = self.y_result.column(j).iter().copied().collect();
                json!({
                    "label": label,
                    "role": role,
                    "amounts": amounts,
                })
            })
            .collect();
        json!({
            "model": self.model,
            "time": self.time(),
            "species": species,
        })
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.to_json())?;
        Ok(())
    }
}
