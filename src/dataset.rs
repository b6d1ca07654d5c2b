//! In-memory table the cleaning stages pass between each other.
//!
//! A [`Dataset`] owns an ordered header list and a sequence of rows whose
//! cells are `Option<Value>`, where `None` is the missing marker. Every row
//! has exactly one cell per header; constructors pad or truncate ragged input
//! so later stages can index by column position without bounds checks.

use serde::Serialize;

use crate::data::{self, Value};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Builds a dataset from raw text fields, typing each cell and promoting
    /// integer cells in columns that also hold floats.
    pub fn from_raw(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        let rows = raw_rows
            .iter()
            .map(|raw| raw.iter().map(|field| data::parse_cell(field)).collect())
            .collect();
        let mut dataset = Self::new(headers, rows);
        dataset.promote_numeric_columns();
        dataset
    }

    pub(crate) fn promote_numeric_columns(&mut self) {
        for column in 0..self.headers.len() {
            data::promote_mixed_numeric(&mut self.rows, column);
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &Option<Value>> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.headers, self.rows)
    }

    /// Counts missing cells per column, in header order.
    pub fn missing_summary(&self) -> MissingSummary {
        let by_column = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| ColumnMissing {
                column: name.clone(),
                missing: self.column(idx).filter(|cell| cell.is_none()).count(),
            })
            .collect::<Vec<_>>();
        MissingSummary { by_column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MissingSummary {
    pub by_column: Vec<ColumnMissing>,
}

impl MissingSummary {
    pub fn total(&self) -> usize {
        self.by_column.iter().map(|c| c.missing).sum()
    }

    pub fn for_column(&self, name: &str) -> Option<usize> {
        self.by_column
            .iter()
            .find(|c| c.column == name)
            .map(|c| c.missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn new_pads_and_truncates_rows_to_header_width() {
        let dataset = Dataset::new(
            headers(&["a", "b"]),
            vec![
                vec![Some(Value::Integer(1))],
                vec![
                    Some(Value::Integer(2)),
                    Some(Value::Integer(3)),
                    Some(Value::Integer(4)),
                ],
            ],
        );
        assert_eq!(dataset.rows()[0], vec![Some(Value::Integer(1)), None]);
        assert_eq!(dataset.rows()[1].len(), 2);
    }

    #[test]
    fn from_raw_types_cells_and_promotes_mixed_columns() {
        let dataset = Dataset::from_raw(
            headers(&["score", "city"]),
            vec![
                vec!["1".to_string(), "NY".to_string()],
                vec!["2.5".to_string(), "".to_string()],
            ],
        );
        assert_eq!(dataset.rows()[0][0], Some(Value::Float(1.0)));
        assert_eq!(dataset.rows()[1][1], None);
    }

    #[test]
    fn missing_summary_follows_header_order() {
        let dataset = Dataset::from_raw(
            headers(&["z", "a"]),
            vec![
                vec!["".to_string(), "x".to_string()],
                vec!["".to_string(), "NA".to_string()],
            ],
        );
        let summary = dataset.missing_summary();
        let names = summary
            .by_column
            .iter()
            .map(|c| c.column.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(summary.for_column("z"), Some(2));
        assert_eq!(summary.total(), 3);
    }
}
