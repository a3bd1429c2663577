//! Command-line interface for tabrecon

use crate::options::MissingColumnPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabrecon")]
#[command(about = "Reconcile two tabular datasets row by row")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to tabrecon.json in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory override
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default tabrecon.json
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Compare two tabular files
    Compare {
        /// Left (baseline) file
        left: PathBuf,

        /// Right (new) file
        right: PathBuf,

        /// Comma-separated key columns; rows are matched by position when omitted
        #[arg(short, long, value_delimiter = ',')]
        key: Vec<String>,

        /// Leave unchanged rows out of the output (they are still counted)
        #[arg(long)]
        exclude_unchanged: bool,

        /// Fail when a shared column has different declared types
        #[arg(long)]
        strict_types: bool,

        /// Treat integers and floats with the same integral value as equal
        #[arg(long)]
        numeric_cross_type: bool,

        /// Columns found on one side only: "pad", "ignore", or "mismatch"
        #[arg(long, value_parser = MissingColumnPolicy::parse)]
        missing_columns: Option<MissingColumnPolicy>,

        /// Name of the synthetic status column
        #[arg(long)]
        status_column: Option<String>,

        /// Output format: "pretty", "json", or "csv"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Write the rendered result to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum rows shown by the pretty format
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// Level forced onto the logger: `-v` always means debug, otherwise
    /// info unless `RUST_LOG` already chose the filters
    pub fn log_level(&self, rust_log_set: bool) -> Option<log::LevelFilter> {
        if self.verbose {
            Some(log::LevelFilter::Debug)
        } else if rust_log_set {
            None
        } else {
            Some(log::LevelFilter::Info)
        }
    }
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!(
                "Invalid output format: {}. Use 'pretty', 'json', or 'csv'",
                s
            )),
        }
    }
}
