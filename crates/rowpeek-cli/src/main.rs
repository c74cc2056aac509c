//! rowpeek CLI - preview rows of CSV and XLSX files

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rowpeek::prelude::*;
use rowpeek::DEFAULT_ROW_COUNT;
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: i64 = DEFAULT_ROW_COUNT as i64;

#[derive(Parser)]
#[command(name = "rowpeek")]
#[command(
    author,
    version,
    about = "Preview the head, tail or a sample of a CSV or XLSX file"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview rows of a CSV file
    Csv {
        #[command(subcommand)]
        rows: RowsCommand,
    },

    /// Preview rows of the first worksheet of an XLSX file
    Xlsx {
        #[command(subcommand)]
        rows: RowsCommand,
    },

    /// Print size, row and column estimates and a header preview as JSON
    Metadata {
        /// Input file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum RowsCommand {
    /// First rows of the file
    Head {
        /// Input file
        file: PathBuf,

        /// Number of rows
        #[arg(default_value_t = DEFAULT_COUNT, allow_negative_numbers = true)]
        n_rows: i64,
    },

    /// Last rows of the file, with their original indices
    Tail {
        /// Input file
        file: PathBuf,

        /// Number of rows
        #[arg(default_value_t = DEFAULT_COUNT, allow_negative_numbers = true)]
        n_rows: i64,
    },

    /// Seeded sample of rows from the range [start_row, end_row)
    Mid {
        /// Input file
        file: PathBuf,

        /// First row of the range (0-based)
        #[arg(allow_negative_numbers = true)]
        start_row: i64,

        /// End of the range, exclusive
        #[arg(allow_negative_numbers = true)]
        end_row: i64,

        /// Number of rows to sample
        #[arg(default_value_t = DEFAULT_COUNT, allow_negative_numbers = true)]
        n_samples: i64,
    },
}

impl RowsCommand {
    fn into_request(self) -> Result<(PathBuf, Selection)> {
        match self {
            RowsCommand::Head { file, n_rows } => Ok((file, Selection::head_from_arg(n_rows))),
            RowsCommand::Tail { file, n_rows } => Ok((file, Selection::tail_from_arg(n_rows))),
            RowsCommand::Mid {
                file,
                start_row,
                end_row,
                n_samples,
            } => {
                let selection = Selection::middle_from_args(start_row, end_row, n_samples)
                    .context("Invalid row range")?;
                Ok((file, selection))
            }
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Csv { rows } => preview_rows(SourceFormat::Csv, rows),
        Commands::Xlsx { rows } => preview_rows(SourceFormat::Xlsx, rows),
        Commands::Metadata { file } => show_metadata(&file),
    }
}

/// Log to stderr so stdout only carries the output document
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn preview_rows(format: SourceFormat, rows: RowsCommand) -> Result<()> {
    let (file, selection) = rows.into_request()?;

    let doc = preview(format, &file, &selection)
        .with_context(|| format!("Failed to preview '{}'", file.display()))?;

    let mut out = io::stdout().lock();
    doc.write_to(&mut out)
        .context("Failed to write preview to stdout")?;
    out.flush().context("Failed to write to stdout")?;

    Ok(())
}

fn show_metadata(file: &Path) -> Result<()> {
    let meta = probe(file);
    let json = meta.to_json().context("Failed to serialize metadata")?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", json).context("Failed to write to stdout")?;

    Ok(())
}
