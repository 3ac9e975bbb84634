//! `ReplyDesk` CLI - Command-line interface for the `ReplyDesk` template manager
//!
//! Provides commands for listing, showing, adding, updating and deleting
//! support reply templates, plus AI-assisted enhancing, generating,
//! question answering and screenshot-based reply suggestions.

mod cli;
mod commands;
mod error;
mod format;
mod util;

use clap::Parser;
use cli::Cli;
use replydesk_core::{TracingConfig, TracingLevel, TracingOutput, init_tracing};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let level = if cli.quiet {
        TracingLevel::Error
    } else {
        TracingLevel::from_verbosity(cli.verbose)
    };
    let mut tracing_config = TracingConfig::new()
        .with_level(level)
        .with_targets(cli.verbose >= 3);
    if let Some(path) = &cli.log_file {
        tracing_config = tracing_config.with_output(TracingOutput::File(path.clone()));
    }
    if let Some(filter) = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|f| !f.trim().is_empty())
    {
        tracing_config = tracing_config.with_filter(filter);
    }
    if let Err(e) = init_tracing(&tracing_config) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let result = commands::dispatch(config_path, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
