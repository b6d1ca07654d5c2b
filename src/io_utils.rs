//! Delimiter and encoding resolution plus CSV reader/writer construction.
//!
//! - **Delimiters**: `.tsv` inputs default to tab, all other delimited inputs
//!   to comma, unless overridden on the command line.
//! - **Encoding**: input bytes are decoded with `encoding_rs` (UTF-8 unless a
//!   label is given). Undecodable sequences are replaced, not fatal.
//! - **Output**: cleaned tables are always written as comma-separated UTF-8
//!   with minimal quoting.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read},
    path::Path,
};

use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::error::{CleanError, CleanResult};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> CleanResult<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| CleanError::UnknownEncoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
) -> CleanResult<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| CleanError::io(path, source))?;
    Ok(open_csv_reader(BufReader::new(file), delimiter))
}

pub fn open_csv_writer(path: &Path) -> CleanResult<csv::Writer<BufWriter<File>>> {
    let file = File::create(path).map_err(|source| CleanError::io(path, source))?;
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(DEFAULT_CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(BufWriter::new(file)))
}

/// Decodes `bytes`, replacing invalid sequences. The flag reports whether any
/// replacement happened.
pub fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> (String, bool) {
    let (text, _, had_errors) = encoding.decode(bytes);
    (text.into_owned(), had_errors)
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> (Vec<String>, bool) {
    let mut lossy = false;
    let fields = record
        .iter()
        .map(|field| {
            let (text, had_errors) = decode_lossy(field, encoding);
            lossy |= had_errors;
            text
        })
        .collect();
    (fields, lossy)
}
