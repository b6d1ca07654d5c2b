use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::loader::LoadOptions;

#[derive(Debug, Parser)]
#[command(author, version, about = "Remove duplicates and repair missing values in tabular datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean a CSV or spreadsheet file and write the cleaned data and a report
    Clean(CleanArgs),
    /// Show shape, column classification, and missing values without cleaning
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Input dataset (.csv, .tsv, .txt, .xlsx, .xlsm, .xlsb, .xls or .ods)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Delimiter for delimited inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Worksheet to read from spreadsheet inputs (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
}

impl SourceArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter,
            input_encoding: self.input_encoding.clone(),
            sheet: self.sheet.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Dataset name used as the prefix of every output file
    #[arg(short = 'n', long = "name")]
    pub name: String,
    /// Directory that receives the cleaned data, duplicates, and report
    #[arg(short = 'd', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Number of leading rows to preview (0 disables the preview)
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// Print the profile as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_single_characters() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn clean_arguments_parse_with_defaults() {
        let cli = Cli::try_parse_from(["csv-cleaner", "clean", "-i", "data.csv", "-n", "sales"])
            .expect("parse");
        match cli.command {
            Commands::Clean(args) => {
                assert_eq!(args.name, "sales");
                assert_eq!(args.output_dir, PathBuf::from("."));
                assert_eq!(args.source.delimiter, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
