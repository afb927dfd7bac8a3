//! CLI: configuration, secret resolution, CSV journal sink
//!
//! This crate provides the `daybook` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;
pub mod sink;

pub use cli::Cli;
pub use error::{AppError, AppResult};
