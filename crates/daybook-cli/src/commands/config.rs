//! Configuration commands.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &AppConfig) -> AppResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", AppConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration, resolving secret references.
pub fn validate(config: &AppConfig) -> AppResult<()> {
    config.validate().map_err(AppError::Config)?;

    if !config.has_providers() {
        println!("Configuration is valid, but no providers are configured.");
        return Ok(());
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> AppResult<()> {
    println!("config: {}", AppConfig::default_path().display());
    Ok(())
}
