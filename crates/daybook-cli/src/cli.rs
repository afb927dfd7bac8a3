//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// daybook - Aggregate journal entries from files and calendars into a CSV journal
#[derive(Debug, Parser)]
#[command(name = "daybook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DAYBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the CSV journal to append to (overrides the config file)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Validate the configuration, resolving secret references
    Validate,
    /// Show the configuration file path
    Path,
}
