//! Cleaning run orchestration.
//!
//! A run moves through `Loaded -> Deduplicated -> Imputed -> Saved ->
//! Reported` exactly once. Each transition is announced to an [`EventSink`]
//! with the counters produced by that stage, so a CLI, a test, or any other
//! caller observes the same signal. A failure at any point ends the run with
//! the error; nothing is retried.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    dataset::{Dataset, MissingSummary},
    dedup,
    error::CleanResult,
    loader::{self, LoadOptions},
    missing::{self, ColumnFill},
    report::{self, CleaningReport},
    writer::{self, OutputPaths},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Loaded,
    Deduplicated,
    Imputed,
    Saved,
    Reported,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Loaded => "loaded",
            Stage::Deduplicated => "deduplicated",
            Stage::Imputed => "imputed",
            Stage::Saved => "saved",
            Stage::Reported => "reported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PipelineEvent {
    Loaded {
        rows: usize,
        columns: usize,
        missing: MissingSummary,
    },
    Deduplicated {
        duplicates: usize,
        rows: usize,
    },
    Imputed {
        rows_dropped: usize,
        rows: usize,
        fills: Vec<ColumnFill>,
        all_missing_columns: Vec<String>,
        remaining_missing: usize,
    },
    Saved {
        clean_path: PathBuf,
        duplicates_path: Option<PathBuf>,
    },
    Reported {
        report_path: PathBuf,
    },
}

impl PipelineEvent {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineEvent::Loaded { .. } => Stage::Loaded,
            PipelineEvent::Deduplicated { .. } => Stage::Deduplicated,
            PipelineEvent::Imputed { .. } => Stage::Imputed,
            PipelineEvent::Saved { .. } => Stage::Saved,
            PipelineEvent::Reported { .. } => Stage::Reported,
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, event: &PipelineEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&PipelineEvent),
{
    fn emit(&mut self, event: &PipelineEvent) {
        (*self)(event)
    }
}

/// Renders events as `info` log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &PipelineEvent) {
        debug!("Entered stage '{}'", event.stage().as_str());
        match event {
            PipelineEvent::Loaded {
                rows,
                columns,
                missing,
            } => {
                info!("Dataset contains {rows} rows and {columns} columns");
                info!("No of missing values in the dataset: {}", missing.total());
                for column in &missing.by_column {
                    info!("  {}: {}", column.column, column.missing);
                }
            }
            PipelineEvent::Deduplicated { duplicates, .. } => {
                info!("Total duplicate records in the dataset: {duplicates}");
            }
            PipelineEvent::Imputed {
                rows_dropped,
                rows,
                fills,
                all_missing_columns,
                remaining_missing,
            } => {
                info!("Rows dropped due to missing ID: {rows_dropped}");
                for fill in fills {
                    info!(
                        "Filled {} missing value(s) in '{}'",
                        fill.filled(),
                        fill.column()
                    );
                }
                if !all_missing_columns.is_empty() {
                    warn!(
                        "Columns with no values were filled as categorical: {}",
                        all_missing_columns.join(", ")
                    );
                }
                info!("Cleaning completed: final dataset rows {rows}");
                info!("Remaining missing values: {remaining_missing}");
            }
            PipelineEvent::Saved {
                clean_path,
                duplicates_path,
            } => {
                if let Some(path) = duplicates_path {
                    info!("Duplicate rows saved as {}", path.display());
                }
                info!("Cleaned dataset saved as {}", clean_path.display());
            }
            PipelineEvent::Reported { report_path } => {
                info!("Detailed cleaning report generated: {}", report_path.display());
            }
        }
    }
}

/// Result of the in-memory part of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub table: Dataset,
    pub duplicates: Dataset,
    pub initial_rows: usize,
    pub duplicates_removed: usize,
    pub rows_dropped: usize,
    pub remaining_missing: usize,
}

impl Cleaned {
    pub fn final_rows(&self) -> usize {
        self.table.row_count()
    }
}

/// Deduplicates then repairs `table`, announcing both stages.
pub fn clean(table: Dataset, sink: &mut dyn EventSink) -> Cleaned {
    let initial_rows = table.row_count();

    let deduplicated = dedup::resolve(table);
    let duplicates_removed = deduplicated.duplicate_count();
    sink.emit(&PipelineEvent::Deduplicated {
        duplicates: duplicates_removed,
        rows: deduplicated.table.row_count(),
    });

    let imputed = missing::resolve(deduplicated.table);
    let remaining_missing = imputed.remaining_total();
    sink.emit(&PipelineEvent::Imputed {
        rows_dropped: imputed.rows_dropped,
        rows: imputed.table.row_count(),
        fills: imputed.fills.clone(),
        all_missing_columns: imputed.all_missing_columns.clone(),
        remaining_missing,
    });

    let cleaned = Cleaned {
        table: imputed.table,
        duplicates: deduplicated.duplicates,
        initial_rows,
        duplicates_removed,
        rows_dropped: imputed.rows_dropped,
        remaining_missing,
    };
    debug_assert_eq!(
        cleaned.final_rows(),
        initial_rows - duplicates_removed - cleaned.rows_dropped
    );
    cleaned
}

#[derive(Debug, Clone)]
pub struct CleaningJob {
    pub input: PathBuf,
    pub dataset_name: String,
    pub output_dir: PathBuf,
    pub load: LoadOptions,
}

impl CleaningJob {
    pub fn new(input: impl Into<PathBuf>, dataset_name: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            dataset_name: dataset_name.into(),
            output_dir: PathBuf::from("."),
            load: LoadOptions::default(),
        }
    }

    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn load_options(mut self, options: LoadOptions) -> Self {
        self.load = options;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningOutcome {
    pub initial_rows: usize,
    pub final_rows: usize,
    pub duplicates_removed: usize,
    pub rows_dropped: usize,
    pub remaining_missing: usize,
    pub clean_path: PathBuf,
    pub duplicates_path: Option<PathBuf>,
    pub report_path: PathBuf,
}

/// Runs all five stages for `job`. Output names are validated before the
/// input is read so a bad name never costs a load.
pub fn run(job: &CleaningJob, sink: &mut dyn EventSink) -> CleanResult<CleaningOutcome> {
    let paths = OutputPaths::for_dataset(&job.output_dir, &job.dataset_name)?;

    let table = loader::load(&job.input, &job.load)?;
    sink.emit(&PipelineEvent::Loaded {
        rows: table.row_count(),
        columns: table.column_count(),
        missing: table.missing_summary(),
    });

    let cleaned = clean(table, sink);

    writer::save(&cleaned.table, &paths.clean)?;
    let duplicates_path = if cleaned.duplicates_removed > 0 {
        writer::save(&cleaned.duplicates, &paths.duplicates)?;
        Some(paths.duplicates.clone())
    } else {
        None
    };
    sink.emit(&PipelineEvent::Saved {
        clean_path: paths.clean.clone(),
        duplicates_path: duplicates_path.clone(),
    });

    let report: CleaningReport = report::build(
        &job.dataset_name,
        &cleaned.table,
        cleaned.initial_rows,
        cleaned.final_rows(),
        cleaned.duplicates_removed,
        cleaned.rows_dropped,
    );
    writer::write_text(&report.render(), &paths.report)?;
    sink.emit(&PipelineEvent::Reported {
        report_path: paths.report.clone(),
    });

    Ok(CleaningOutcome {
        initial_rows: cleaned.initial_rows,
        final_rows: cleaned.final_rows(),
        duplicates_removed: cleaned.duplicates_removed,
        rows_dropped: cleaned.rows_dropped,
        remaining_missing: report.total_missing,
        clean_path: paths.clean,
        duplicates_path,
        report_path: paths.report,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::error::CleanError;

    #[test]
    fn run_emits_every_stage_in_order() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("people.csv");
        fs::write(&input, "id,age,city\n1,25,NY\n1,25,NY\n2,,LA\n,30,\n").expect("write");

        let mut stages = Vec::new();
        let outcome = run(
            &CleaningJob::new(&input, "people").output_dir(dir.path()),
            &mut |event: &PipelineEvent| stages.push(event.stage()),
        )
        .expect("run");

        assert_eq!(
            stages,
            vec![
                Stage::Loaded,
                Stage::Deduplicated,
                Stage::Imputed,
                Stage::Saved,
                Stage::Reported,
            ]
        );
        assert_eq!(outcome.initial_rows, 4);
        assert_eq!(outcome.duplicates_removed, 1);
        assert_eq!(outcome.rows_dropped, 1);
        assert_eq!(outcome.final_rows, 2);
        assert_eq!(outcome.remaining_missing, 0);
        assert!(outcome.duplicates_path.is_some());
    }

    #[test]
    fn unsupported_input_stops_before_any_stage() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("people.json");
        fs::write(&input, "[]").expect("write");

        let mut events = 0usize;
        let err = run(
            &CleaningJob::new(&input, "people").output_dir(dir.path()),
            &mut |_: &PipelineEvent| events += 1,
        )
        .expect_err("unsupported");
        assert!(matches!(err, CleanError::UnsupportedFormat(_)));
        assert_eq!(events, 0);
        assert!(!dir.path().join("people_clean.csv").exists());
        assert!(!dir.path().join("people_report.txt").exists());
    }

    #[test]
    fn failed_clean_write_leaves_no_duplicates_file() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("people.csv");
        fs::write(&input, "id,age\n1,25\n1,25\n").expect("write");
        // A directory squatting on the clean path makes that write fail.
        fs::create_dir(dir.path().join("people_clean.csv")).expect("mkdir");

        let mut stages = Vec::new();
        let err = run(
            &CleaningJob::new(&input, "people").output_dir(dir.path()),
            &mut |event: &PipelineEvent| stages.push(event.stage()),
        )
        .expect_err("clean write fails");
        assert!(matches!(err, CleanError::Io { .. }));
        assert!(!dir.path().join("people_duplicates.csv").exists());
        assert!(!stages.contains(&Stage::Saved));
    }

    #[test]
    fn invalid_name_is_rejected_before_loading() {
        let err = run(
            &CleaningJob::new("/no/such/file.csv", "../escape"),
            &mut LogSink,
        )
        .expect_err("invalid name");
        assert!(matches!(err, CleanError::InvalidDatasetName(_)));
    }

    #[test]
    fn events_serialize_with_stage_tag() {
        let event = PipelineEvent::Deduplicated {
            duplicates: 2,
            rows: 10,
        };
        let json = serde_json::to_value(&event).expect("json");
        assert_eq!(json["stage"], "deduplicated");
        assert_eq!(json["duplicates"], 2);
    }
}
