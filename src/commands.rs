//! Command implementations for tabrecon CLI

use crate::cli::{Commands, OutputFormat};
use crate::config::ReconConfig;
use crate::data::DataProcessor;
use crate::error::{Result, TabreconError};
use crate::keys::KeySpec;
use crate::options::MissingColumnPolicy;
use crate::output::{CsvFormatter, JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use crate::reconciler::Reconciler;
use std::path::{Path, PathBuf};

/// Flags given to `compare`, before they are merged with the config file
#[derive(Debug, Clone, Default)]
pub struct CompareArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    pub key: Vec<String>,
    pub exclude_unchanged: bool,
    pub strict_types: bool,
    pub numeric_cross_type: bool,
    pub missing_columns: Option<MissingColumnPolicy>,
    pub status_column: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub limit: Option<usize>,
}

/// Execute a command
pub fn execute_command(
    command: Commands,
    config_path: Option<&Path>,
    dir: Option<&Path>,
) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let root = dir.unwrap_or(&current_dir);

    match command {
        Commands::Init { force } => init_command(root, force),
        Commands::Compare {
            left,
            right,
            key,
            exclude_unchanged,
            strict_types,
            numeric_cross_type,
            missing_columns,
            status_column,
            format,
            output,
            limit,
        } => compare_command(
            root,
            config_path,
            CompareArgs {
                left,
                right,
                key,
                exclude_unchanged,
                strict_types,
                numeric_cross_type,
                missing_columns,
                status_column,
                format,
                output,
                limit,
            },
        ),
    }
}

/// Write a default configuration file
fn init_command(root: &Path, force: bool) -> Result<()> {
    let path = ReconConfig::default_path(root);
    ReconConfig::default().write(&path, force)?;

    println!("✅ Wrote default configuration: {}", path.display());
    Ok(())
}

/// Command-line flags take precedence over the config file
fn merge_config(mut config: ReconConfig, args: &CompareArgs) -> Result<ReconConfig> {
    if args.exclude_unchanged {
        config.include_unchanged = false;
    }
    if args.strict_types {
        config.strict_types = true;
    }
    if args.numeric_cross_type {
        config.numeric_cross_type = true;
    }
    if let Some(policy) = args.missing_columns {
        config.missing_columns = policy;
    }
    if let Some(name) = &args.status_column {
        config.status_column = name.clone();
    }
    if let Some(limit) = args.limit {
        config.row_limit = limit;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Reconcile two files and render the result
fn compare_command(root: &Path, config_path: Option<&Path>, args: CompareArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format).map_err(TabreconError::invalid_input)?;
    let config = merge_config(ReconConfig::load(config_path, root)?, &args)?;

    let key_spec = if args.key.is_empty() {
        KeySpec::Positional
    } else {
        KeySpec::columns(args.key.iter().map(|k| k.trim()))?
    };

    let left_path = resolve_path(root, &args.left);
    let right_path = resolve_path(root, &args.right);

    // Spinners would interleave with machine-readable stdout
    let show_progress = format == OutputFormat::Pretty && args.output.is_none();
    let mut progress = if show_progress {
        ProgressReporter::new_for_compare()
    } else {
        ProgressReporter::new_minimal()
    };

    log::info!(
        "Comparing {} -> {}",
        left_path.display(),
        right_path.display()
    );

    let processor = DataProcessor::new_with_config(&config.memory_limit)?;
    let left = processor.load_dataset(&left_path, "left")?;
    let right = processor.load_dataset(&right_path, "right")?;
    progress.finish_loading(&format!(
        "Loaded {} and {} rows",
        left.row_count(),
        right.row_count()
    ));

    let reconciler = Reconciler::new(config.to_options());
    let result = reconciler.compare(&left, &right, &key_spec)?;
    progress.finish_compare("Reconciliation complete");
    drop(progress);

    let rendered = match format {
        OutputFormat::Pretty => PrettyPrinter::render_result(&result, config.row_limit),
        OutputFormat::Json => JsonFormatter::format_result(&result)?,
        OutputFormat::Csv => CsvFormatter::format_result(&result)?,
    };

    match args.output {
        Some(path) => {
            let path = resolve_path(root, &path);
            std::fs::write(&path, rendered)?;
            println!("💾 Result saved to: {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
