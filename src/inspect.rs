//! Read-only dataset profile: shape, column classification, missing counts,
//! and a short preview. Nothing is cleaned or written.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::InspectArgs,
    data,
    dataset::Dataset,
    loader,
    missing::{self, ColumnKind},
    table,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub present: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub total_missing: usize,
    pub column_profiles: Vec<ColumnProfile>,
}

pub fn profile(dataset: &Dataset) -> DatasetProfile {
    let kinds = missing::classify(dataset);
    let summary = dataset.missing_summary();
    let column_profiles = summary
        .by_column
        .iter()
        .zip(kinds)
        .map(|(column, kind)| ColumnProfile {
            name: column.column.clone(),
            kind,
            missing: column.missing,
            present: dataset.row_count() - column.missing,
        })
        .collect();
    DatasetProfile {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        total_missing: summary.total(),
        column_profiles,
    }
}

pub fn execute(args: &InspectArgs) -> Result<()> {
    let input = &args.source.input;
    let dataset = loader::load(input, &args.source.load_options())
        .with_context(|| format!("Loading dataset from {input:?}"))?;
    let profile = profile(&dataset);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&profile).context("Serializing dataset profile")?;
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "rows: {}  columns: {}  missing: {}",
        profile.rows, profile.columns, profile.total_missing
    );
    println!();
    let headers = vec![
        "column".to_string(),
        "kind".to_string(),
        "present".to_string(),
        "missing".to_string(),
    ];
    let rows = profile
        .column_profiles
        .iter()
        .map(|column| {
            vec![
                column.name.clone(),
                column.kind.as_str().to_string(),
                column.present.to_string(),
                column.missing.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);

    if args.rows > 0 && !dataset.is_empty() {
        println!();
        let preview = dataset
            .rows()
            .iter()
            .take(args.rows)
            .map(|row| row.iter().map(data::display_cell).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        table::print_table(dataset.headers(), &preview);
    }
    info!("Inspected {} column(s) in {:?}", profile.columns, input);
    Ok(())
}
