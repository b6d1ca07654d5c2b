//! Error taxonomy for loading, cleaning, and persisting datasets.
//!
//! Every variant terminates a cleaning run. Nothing here is retried; the
//! command layer wraps these in `anyhow` context and reports them to the
//! invoker.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    /// The input path does not exist.
    #[error("Input path {0:?} does not exist")]
    PathNotFound(PathBuf),

    /// The extension is neither a delimited nor a spreadsheet format.
    #[error("Unsupported file format for {0:?} (expected .csv, .tsv, .txt, .xlsx, .xlsm, .xls or .ods)")]
    UnsupportedFormat(PathBuf),

    /// Dataset names become file name prefixes and must be plain names.
    #[error("Invalid dataset name '{0}': must be non-empty and contain no path separators")]
    InvalidDatasetName(String),

    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Workbook {0:?} does not contain any worksheet")]
    EmptyWorkbook(PathBuf),

    #[error("Worksheet '{sheet}' not found in {path:?}")]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row holds more fields than the header names. Short rows are
    /// padded with missing cells instead.
    #[error("Line {line} of {path:?} has {found} fields, expected at most {expected}")]
    TooManyFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Spreadsheet error in {path:?}: {reason}")]
    Spreadsheet { path: PathBuf, reason: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CleanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        CleanError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type CleanResult<T> = std::result::Result<T, CleanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_the_path() {
        let err = CleanError::UnsupportedFormat(PathBuf::from("data.json"));
        assert!(err.to_string().contains("data.json"));
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = CleanError::io(
            "out.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "denied");
    }
}
