pub mod cli;
pub mod data;
pub mod dataset;
pub mod dedup;
pub mod error;
pub mod inspect;
pub mod io_utils;
pub mod loader;
pub mod missing;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod writer;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{CleanArgs, Cli, Commands},
    pipeline::{CleaningJob, LogSink},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_cleaner", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Inspect(args) => inspect::execute(&args),
    }
}

fn handle_clean(args: &CleanArgs) -> Result<()> {
    let input = &args.source.input;
    info!(
        "Cleaning '{}' as dataset '{}' into {:?}",
        input.display(),
        args.name,
        args.output_dir
    );
    debug!(
        "Delimiter override: {}",
        args.source
            .delimiter
            .map(printable_delimiter)
            .unwrap_or_else(|| "auto".to_string())
    );
    let job = CleaningJob::new(input, args.name.as_str())
        .output_dir(&args.output_dir)
        .load_options(args.source.load_options());
    let outcome = pipeline::run(&job, &mut LogSink)
        .with_context(|| format!("Cleaning dataset from {input:?}"))?;
    info!(
        "Cleaned {} -> {} row(s) ({} duplicate(s), {} dropped for missing ID)",
        outcome.initial_rows, outcome.final_rows, outcome.duplicates_removed, outcome.rows_dropped
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
