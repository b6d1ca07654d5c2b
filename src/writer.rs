//! Persists cleaned tables and the text report.
//!
//! Output names are fixed for a dataset name `N`: `N_clean.csv`,
//! `N_duplicates.csv` (only written when duplicates exist) and
//! `N_report.txt`. Existing files are overwritten.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    data,
    dataset::Dataset,
    error::{CleanError, CleanResult},
    io_utils,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub clean: PathBuf,
    pub duplicates: PathBuf,
    pub report: PathBuf,
}

impl OutputPaths {
    pub fn for_dataset(output_dir: &Path, name: &str) -> CleanResult<Self> {
        validate_dataset_name(name)?;
        Ok(Self {
            clean: output_dir.join(format!("{name}_clean.csv")),
            duplicates: output_dir.join(format!("{name}_duplicates.csv")),
            report: output_dir.join(format!("{name}_report.txt")),
        })
    }
}

pub fn validate_dataset_name(name: &str) -> CleanResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
    {
        return Err(CleanError::InvalidDatasetName(name.to_string()));
    }
    Ok(())
}

/// Writes `table` as comma-separated text with a header row. Missing cells
/// become empty fields.
pub fn save(table: &Dataset, path: &Path) -> CleanResult<()> {
    let mut writer = io_utils::open_csv_writer(path)?;
    writer
        .write_record(table.headers())
        .map_err(|source| CleanError::csv(path, source))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(data::display_cell))
            .map_err(|source| CleanError::csv(path, source))?;
    }
    writer
        .flush()
        .map_err(|source| CleanError::io(path, source))?;
    Ok(())
}

pub fn write_text(content: &str, path: &Path) -> CleanResult<()> {
    fs::write(path, content).map_err(|source| CleanError::io(path, source))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::data::Value;

    #[test]
    fn output_paths_follow_naming_contract() {
        let paths = OutputPaths::for_dataset(Path::new("out"), "sales").expect("paths");
        assert_eq!(paths.clean, Path::new("out/sales_clean.csv"));
        assert_eq!(paths.duplicates, Path::new("out/sales_duplicates.csv"));
        assert_eq!(paths.report, Path::new("out/sales_report.txt"));
    }

    #[test]
    fn dataset_names_must_be_plain() {
        assert!(validate_dataset_name("q3 sales").is_ok());
        for bad in ["", "  ", "../x", "a/b", "a\\b", " padded", ".."] {
            assert!(
                matches!(
                    validate_dataset_name(bad),
                    Err(CleanError::InvalidDatasetName(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn save_writes_header_and_blank_missing_cells() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");
        let table = Dataset::new(
            vec!["id".to_string(), "note".to_string()],
            vec![
                vec![Some(Value::Integer(1)), Some(Value::String("a, b".to_string()))],
                vec![Some(Value::Float(2.0)), None],
            ],
        );
        save(&table, &path).expect("save");
        let written = fs::read_to_string(&path).expect("read");
        assert_eq!(written, "id,note\n1,\"a, b\"\n2,\n");
    }

    #[test]
    fn write_text_overwrites_existing_content() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("report.txt");
        write_text("first run, longer content", &path).expect("first");
        write_text("second", &path).expect("second");
        assert_eq!(fs::read_to_string(&path).expect("read"), "second");
    }
}
