//! Secret reference resolver.
//!
//! Credential values in `config.toml` can use special prefixes to reference
//! secrets stored outside the file:
//!
//! - `pass::path/in/store` — runs `pass show path/in/store`, returns first line
//! - `env::VAR_NAME` — reads `$VAR_NAME` from the environment
//! - `secret-tool::attribute/value` — runs `secret-tool lookup attribute value`
//!   (freedesktop Secret Service)
//! - anything else — returned as-is (plain text)

/// Resolves a value that may contain a secret reference prefix.
pub fn resolve(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)
    } else if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)
    } else if let Some(pair) = value.strip_prefix("secret-tool::") {
        resolve_secret_tool(pair)
    } else {
        Ok(value.to_string())
    }
}

/// Runs `pass show <path>` and returns the first line of stdout.
fn resolve_pass(path: &str) -> Result<String, String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed (exit {}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .map(|s| s.to_string())
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}

/// Reads an environment variable.
fn resolve_env(var: &str) -> Result<String, String> {
    std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
}

/// Runs `secret-tool lookup <attribute> <value>` and returns the first line.
fn resolve_secret_tool(pair: &str) -> Result<String, String> {
    let (attribute, value) = pair.split_once('/').ok_or_else(|| {
        format!(
            "secret-tool reference `{}` must have the form attribute/value",
            pair
        )
    })?;

    let output = std::process::Command::new("secret-tool")
        .arg("lookup")
        .arg(attribute)
        .arg(value)
        .output()
        .map_err(|e| format!("failed to run `secret-tool lookup {} {}`: {}", attribute, value, e))?;

    if !output.status.success() {
        return Err(format!(
            "`secret-tool lookup {} {}` failed (exit {})",
            attribute, value, output.status
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .map(|s| s.to_string())
        .ok_or_else(|| format!("`secret-tool lookup {} {}` produced no output", attribute, value))
}
