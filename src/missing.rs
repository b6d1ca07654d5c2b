//! Column classification and missing-value repair.
//!
//! Columns whose name contains `id` (any case) are identifiers: rows with a
//! gap in any of them are dropped and the columns are never filled. The
//! remaining columns are classified on the table left after that drop.
//! Numeric columns are filled with the median of their present values and
//! everything else with [`UNKNOWN_SENTINEL`].
//!
//! A column with no present values is not numeric, so it takes the
//! categorical fill. That case is logged and listed in
//! [`Imputed::all_missing_columns`] so callers can see it happened.

use log::{debug, warn};
use serde::Serialize;

use crate::{
    data::{UNKNOWN_SENTINEL, Value},
    dataset::{Dataset, MissingSummary, Row},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Identifier,
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Identifier => "identifier",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

pub fn is_identifier_name(name: &str) -> bool {
    name.to_lowercase().contains("id")
}

/// Classifies a non-identifier column from the values it currently holds.
pub fn classify_values<'a, I>(values: I) -> ColumnKind
where
    I: IntoIterator<Item = &'a Option<Value>>,
{
    let mut present = 0usize;
    for value in values.into_iter().flatten() {
        if !value.is_numeric() {
            return ColumnKind::Categorical;
        }
        present += 1;
    }
    if present > 0 {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Classifies every column of `table` in header order.
pub fn classify(table: &Dataset) -> Vec<ColumnKind> {
    classify_rows(table.headers(), table.rows())
}

fn classify_rows(headers: &[String], rows: &[Row]) -> Vec<ColumnKind> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if is_identifier_name(name) {
                ColumnKind::Identifier
            } else {
                classify_values(rows.iter().map(|row| &row[idx]))
            }
        })
        .collect()
}

/// Median of `values`; `None` for an empty slice.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len().is_multiple_of(2) {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ColumnFill {
    Median {
        column: String,
        value: f64,
        filled: usize,
    },
    Sentinel {
        column: String,
        filled: usize,
    },
}

impl ColumnFill {
    pub fn column(&self) -> &str {
        match self {
            ColumnFill::Median { column, .. } | ColumnFill::Sentinel { column, .. } => column,
        }
    }

    pub fn filled(&self) -> usize {
        match self {
            ColumnFill::Median { filled, .. } | ColumnFill::Sentinel { filled, .. } => *filled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Imputed {
    pub table: Dataset,
    /// Rows removed because an identifier column was missing.
    pub rows_dropped: usize,
    /// Classification used for the fill, in header order.
    pub kinds: Vec<ColumnKind>,
    /// Columns that received at least one fill value.
    pub fills: Vec<ColumnFill>,
    /// Non-identifier columns that had no present value at all.
    pub all_missing_columns: Vec<String>,
    /// Missing cells left after repair, counted rather than assumed.
    pub remaining: MissingSummary,
}

impl Imputed {
    pub fn remaining_total(&self) -> usize {
        self.remaining.total()
    }
}

pub fn resolve(table: Dataset) -> Imputed {
    let (headers, rows) = table.into_parts();
    let identifier_columns = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| is_identifier_name(name))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();

    let before = rows.len();
    let mut rows = if identifier_columns.is_empty() {
        rows
    } else {
        rows.into_iter()
            .filter(|row| identifier_columns.iter().all(|&idx| row[idx].is_some()))
            .collect::<Vec<_>>()
    };
    let rows_dropped = before - rows.len();
    if rows_dropped > 0 {
        debug!(
            "Dropped {rows_dropped} row(s) missing a value in {:?}",
            identifier_columns
                .iter()
                .map(|&idx| headers[idx].as_str())
                .collect::<Vec<_>>()
        );
    }

    let kinds = classify_rows(&headers, &rows);

    let mut fills = Vec::new();
    let mut all_missing_columns = Vec::new();
    for (idx, kind) in kinds.iter().enumerate() {
        let column = &headers[idx];
        let gaps = rows.iter().filter(|row| row[idx].is_none()).count();
        match kind {
            ColumnKind::Identifier => continue,
            ColumnKind::Numeric => {
                if gaps == 0 {
                    continue;
                }
                let Some(fill) = fill_numeric(&mut rows, idx) else {
                    warn!("Column '{column}' has no numeric values to take a median from");
                    continue;
                };
                debug!("Filled {gaps} gap(s) in '{column}' with median {fill}");
                fills.push(ColumnFill::Median {
                    column: column.clone(),
                    value: fill,
                    filled: gaps,
                });
            }
            ColumnKind::Categorical => {
                if !rows.is_empty() && gaps == rows.len() {
                    warn!(
                        "Column '{column}' has no present values; filling with '{UNKNOWN_SENTINEL}'"
                    );
                    all_missing_columns.push(column.clone());
                }
                if gaps == 0 {
                    continue;
                }
                for row in rows.iter_mut() {
                    if row[idx].is_none() {
                        row[idx] = Some(Value::String(UNKNOWN_SENTINEL.to_string()));
                    }
                }
                debug!("Filled {gaps} gap(s) in '{column}' with '{UNKNOWN_SENTINEL}'");
                fills.push(ColumnFill::Sentinel {
                    column: column.clone(),
                    filled: gaps,
                });
            }
        }
    }

    let table = Dataset::new(headers, rows);
    let remaining = table.missing_summary();
    Imputed {
        table,
        rows_dropped,
        kinds,
        fills,
        all_missing_columns,
        remaining,
    }
}

/// Fills gaps in a numeric column with its median. Returns the median, or
/// `None` when the column has no numeric values.
fn fill_numeric(rows: &mut [Row], idx: usize) -> Option<f64> {
    let mut present = rows
        .iter()
        .filter_map(|row| row[idx].as_ref().and_then(Value::as_f64))
        .collect::<Vec<_>>();
    let median = median(&mut present)?;
    let all_integer = rows
        .iter()
        .all(|row| matches!(row[idx], None | Some(Value::Integer(_))));

    let exact = if all_integer {
        let mut integers = rows
            .iter()
            .filter_map(|row| match row[idx] {
                Some(Value::Integer(i)) => Some(i),
                _ => None,
            })
            .collect::<Vec<_>>();
        integer_median(&mut integers)
    } else {
        None
    };
    let fill = match exact {
        Some(value) => Value::Integer(value),
        None => {
            for row in rows.iter_mut() {
                if let Some(Value::Integer(i)) = row[idx] {
                    row[idx] = Some(Value::Float(i as f64));
                }
            }
            Value::Float(median)
        }
    };
    for row in rows.iter_mut() {
        if row[idx].is_none() {
            row[idx] = Some(fill.clone());
        }
    }
    Some(median)
}

/// Median of integer `values` when it is itself an integer. Computed without
/// going through `f64` so values beyond 2^53 stay exact.
fn integer_median(values: &mut [i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len().is_multiple_of(2) {
        let sum = i128::from(values[mid - 1]) + i128::from(values[mid]);
        (sum % 2 == 0).then(|| (sum / 2) as i64)
    } else {
        Some(values[mid])
    }
}
