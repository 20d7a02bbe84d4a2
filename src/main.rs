//! Venture - Entry Point

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use venture::config::{self, KeyBindings};
use venture::model::{AppError, ViewError};
use venture::source::{EventLogSource, ExportFormat, RecordSource};
use venture::view::{self, ColorConfig, ViewOptions};

/// Venture - page through structured event logs in the terminal
#[derive(Parser, Debug)]
#[command(name = "venture")]
#[command(version)]
#[command(about = "TUI application for browsing EVTX and JSONL event logs page by page")]
pub struct Args {
    /// Event log to open (.evtx, or one JSON object per line)
    pub file: Option<PathBuf>,

    /// Records per page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write every record of FILE to this path and exit without the TUI
    #[arg(long, requires = "file")]
    pub export: Option<PathBuf>,

    /// Export format: csv or json
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let page_size = args.page_size.and_then(|n| usize::try_from(n).ok());
    let config = config::resolve(args.config.clone(), page_size).map_err(AppError::from)?;

    venture::logging::init(&config.log_file_path).map_err(AppError::from)?;

    info!(config = ?config, "Configuration loaded and resolved");

    match (&args.export, &args.file) {
        (Some(out), Some(file)) => {
            let count = run_export(file, out, args.format, config.page_size)?;
            println!("Exported {count} records to {}", out.display());
        }
        _ => {
            let options = ViewOptions {
                initial_file: args.file,
                hidden_columns: config.hidden_columns,
                key_bindings: KeyBindings::default(),
                colors: ColorConfig::from_env_and_args(args.no_color),
            };
            view::run_with_source(EventLogSource::new(config.page_size), options)?;
        }
    }

    Ok(())
}

/// Load `file` without the TUI and export all of its records.
fn run_export(
    file: &Path,
    out: &Path,
    format: ExportFormat,
    page_size: usize,
) -> Result<usize, AppError> {
    let mut source = EventLogSource::new(page_size);
    source.load_file(file).map_err(ViewError::from)?;
    Ok(source.export(out, format)?)
}
