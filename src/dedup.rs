//! Exact-duplicate row removal.

use std::collections::HashSet;

use log::debug;

use crate::dataset::{Dataset, Row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduplicated {
    pub table: Dataset,
    /// Rows identical to an earlier row, in their original order.
    pub duplicates: Dataset,
}

impl Deduplicated {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.row_count()
    }
}

/// Keeps the first occurrence of every row and separates all later copies.
pub fn resolve(table: Dataset) -> Deduplicated {
    let (headers, rows) = table.into_parts();
    let mut seen: HashSet<Row> = HashSet::with_capacity(rows.len());
    let mut kept = Vec::with_capacity(rows.len());
    let mut duplicates = Vec::new();
    for row in rows {
        if seen.contains(&row) {
            duplicates.push(row);
        } else {
            seen.insert(row.clone());
            kept.push(row);
        }
    }
    debug!(
        "Kept {} row(s), marked {} duplicate(s)",
        kept.len(),
        duplicates.len()
    );
    Deduplicated {
        table: Dataset::new(headers.clone(), kept),
        duplicates: Dataset::new(headers, duplicates),
    }
}
