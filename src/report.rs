//! Cleaning summary report.
//!
//! The remaining-missing figures are recounted from the final table at build
//! time instead of being taken from the imputation stage, so the report also
//! acts as a check on that stage.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::dataset::{Dataset, MissingSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub dataset_name: String,
    pub initial_rows: usize,
    pub final_rows: usize,
    pub total_columns: usize,
    pub duplicates_removed: usize,
    pub rows_dropped: usize,
    pub total_missing: usize,
    pub missing: MissingSummary,
}

pub fn build(
    dataset_name: &str,
    final_table: &Dataset,
    initial_rows: usize,
    final_rows: usize,
    duplicates_removed: usize,
    rows_dropped: usize,
) -> CleaningReport {
    let missing = final_table.missing_summary();
    CleaningReport {
        dataset_name: dataset_name.to_string(),
        initial_rows,
        final_rows,
        total_columns: final_table.column_count(),
        duplicates_removed,
        rows_dropped,
        total_missing: missing.total(),
        missing,
    }
}

impl CleaningReport {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "DATA CLEANING REPORT");
        let _ = writeln!(out);
        let _ = writeln!(out);
        let _ = writeln!(out, "DATASET SUMMARY");
        let _ = writeln!(out, "Initial Rows: {}", self.initial_rows);
        let _ = writeln!(out, "Final Rows: {}", self.final_rows);
        let _ = writeln!(out, "Total Columns: {}", self.total_columns);
        let _ = writeln!(out);
        let _ = writeln!(out, "CLEANING ACTIONS");
        let _ = writeln!(out, "Duplicates Removed: {}", self.duplicates_removed);
        let _ = writeln!(out, "Rows Dropped Due to Missing ID: {}", self.rows_dropped);
        let _ = writeln!(out);
        let _ = writeln!(out, "MISSING VALUE SUMMARY");
        let _ = writeln!(out, "Total Missing Values Remaining: {}", self.total_missing);
        let _ = writeln!(out);
        let _ = writeln!(out, "Missing Values By Column:");
        for column in &self.missing.by_column {
            let _ = writeln!(out, "{}: {}", column.column, column.missing);
        }
        out
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
