//! Reads a delimited or spreadsheet file into a [`Dataset`].
//!
//! The format is chosen from the file extension alone. Delimited files go
//! through the `csv` reader with lossy decoding; spreadsheets go through
//! `calamine`, taking the first worksheet unless one is named. In both cases
//! the first row supplies the column names.

use std::{collections::HashMap, path::Path};

use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use log::{debug, info, warn};

use crate::{
    data::{self, Value},
    dataset::Dataset,
    error::{CleanError, CleanResult},
    io_utils,
};

const SPREADSHEET_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    pub fn detect(path: &Path) -> CleanResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv" | "tsv" | "txt") => Ok(SourceFormat::Delimited),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(SourceFormat::Spreadsheet),
            _ => Err(CleanError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceFormat::Delimited => "CSV",
            SourceFormat::Spreadsheet => "Excel",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub input_encoding: Option<String>,
    pub sheet: Option<String>,
}

/// Loads `path`. Existence is checked before the extension so a missing file
/// is reported as such regardless of its name.
pub fn load(path: &Path, options: &LoadOptions) -> CleanResult<Dataset> {
    if !path.exists() {
        return Err(CleanError::PathNotFound(path.to_path_buf()));
    }
    let format = SourceFormat::detect(path)?;
    info!("Dataset type: {}", format.label());
    let dataset = match format {
        SourceFormat::Delimited => load_delimited(path, options)?,
        SourceFormat::Spreadsheet => load_spreadsheet(path, options)?,
    };
    debug!(
        "Loaded {} row(s) x {} column(s) from {path:?}",
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(dataset)
}

fn load_delimited(path: &Path, options: &LoadOptions) -> CleanResult<Dataset> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let encoding = io_utils::resolve_encoding(options.input_encoding.as_deref())?;
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;

    let header_record = reader
        .byte_headers()
        .map_err(|source| CleanError::csv(path, source))?
        .clone();
    let (headers, mut lossy) = io_utils::decode_record(&header_record, encoding);

    let mut raw_rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|source| CleanError::csv(path, source))?;
        if record.len() > headers.len() {
            return Err(CleanError::TooManyFields {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |pos| pos.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let (fields, had_errors) = io_utils::decode_record(&record, encoding);
        lossy |= had_errors;
        raw_rows.push(fields);
    }
    if lossy {
        warn!(
            "Replaced undecodable byte sequences in {path:?} while reading as {}",
            encoding.name()
        );
    }
    Ok(Dataset::from_raw(normalize_headers(headers), raw_rows))
}

fn load_spreadsheet(path: &Path, options: &LoadOptions) -> CleanResult<Dataset> {
    let spreadsheet_error = |reason: String| CleanError::Spreadsheet {
        path: path.to_path_buf(),
        reason,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let range = match &options.sheet {
        Some(sheet) => {
            if !workbook.sheet_names().iter().any(|name| name == sheet) {
                return Err(CleanError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: sheet.clone(),
                });
            }
            workbook
                .worksheet_range(sheet)
                .map_err(|e| spreadsheet_error(e.to_string()))?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CleanError::EmptyWorkbook(path.to_path_buf()))?
            .map_err(|e| spreadsheet_error(e.to_string()))?,
    };

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| cell_to_value(cell).map(|v| v.as_display()).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let body = rows
        .map(|row| row.iter().map(cell_to_value).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut dataset = Dataset::new(normalize_headers(headers), body);
    dataset.promote_numeric_columns();
    Ok(dataset)
}

fn cell_to_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Int(i) => Some(Value::Integer(*i)),
        // Spreadsheets store whole numbers as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(Value::Integer(*f as i64))
        }
        Data::Float(f) => Some(Value::Float(*f)),
        Data::String(s) => data::parse_cell(s),
        Data::Bool(b) => Some(Value::String(if *b { "True" } else { "False" }.to_string())),
        Data::DateTime(_) => cell.as_datetime().map(|dt: NaiveDateTime| {
            Value::String(dt.format(SPREADSHEET_DATETIME_FORMAT).to_string())
        }),
        other => Some(Value::String(other.to_string())),
    }
}

/// Names blank headers `Unnamed: <index>` and suffixes repeated names with
/// `.1`, `.2`, ... so every column can be addressed by name.
pub fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let unique = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}
