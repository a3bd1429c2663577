//! Main entry point for tabrecon CLI

use clap::Parser;
use tabrecon::cli::Cli;
use tabrecon::commands::execute_command;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = cli.log_level(std::env::var_os("RUST_LOG").is_some()) {
        builder.filter_level(level);
    }
    builder.init();

    if let Err(e) = execute_command(cli.command, cli.config.as_deref(), cli.dir.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
