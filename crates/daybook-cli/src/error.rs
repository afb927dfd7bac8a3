//! CLI error types.

use thiserror::Error;

use daybook_providers::ProviderError;

/// Result type for CLI operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider error.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
