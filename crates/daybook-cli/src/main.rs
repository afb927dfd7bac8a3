//! daybook CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use daybook_cli::cli::{Cli, Command, ConfigAction};
use daybook_cli::config::AppConfig;
use daybook_cli::error::{AppError, AppResult};
use daybook_core::tracing::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    // Load configuration; an explicitly given path must exist.
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path).map_err(AppError::Config)?
    } else {
        AppConfig::load().map_err(AppError::Config)?
    };

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => daybook_cli::commands::config::dump(&config),
            ConfigAction::Validate => daybook_cli::commands::config::validate(&config),
            ConfigAction::Path => daybook_cli::commands::config::path(),
        },
        None => {
            // Configuration problems are fatal before any ingestion starts.
            config.validate().map_err(AppError::Config)?;

            let output = cli
                .output
                .as_ref()
                .or(config.output.as_ref())
                .ok_or_else(|| {
                    AppError::Config(
                        "no output configured; pass --output or set `output` in config.toml"
                            .to_string(),
                    )
                })?
                .clone();

            daybook_cli::commands::run::run(&config, &output)
        }
    }
}
