//! Application configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/daybook/config.toml` by default, with one optional section per
//! provider kind:
//!
//! ```toml
//! output = "journal.csv"
//!
//! [orgmode]
//! paths = ["~/journal/2019.org"]
//!
//! [icalendar]
//! paths = ["~/calendars/export.ics"]
//!
//! [caldav]
//! url = "https://dav.example.com/calendars/user/"
//! username = "user"
//! password = "secret-tool::daybook/caldav"
//! cache_dir = "~/.cache/daybook/caldav"
//! ```
//!
//! Credential values support secret references (`pass::…`, `env::…`,
//! `secret-tool::…`). A missing or wrong-typed key is a fatal configuration
//! error, reported before any ingestion starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use daybook_providers::caldav::CalDavConfig;

// ---------------------------------------------------------------------------
// AppConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the daybook CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the CSV journal to append to.
    pub output: Option<PathBuf>,

    /// Outline file settings.
    pub orgmode: Option<OrgmodeSettings>,

    /// iCalendar file settings.
    pub icalendar: Option<IcalendarSettings>,

    /// CalDAV server settings.
    pub caldav: Option<CalDavSettings>,
}

/// Outline provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgmodeSettings {
    /// Outline files to ingest.
    pub paths: Vec<PathBuf>,
}

/// iCalendar provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcalendarSettings {
    /// Calendar files to ingest.
    pub paths: Vec<PathBuf>,
}

/// CalDAV provider settings.
///
/// `username` and `password` support secret references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalDavSettings {
    /// Server URL (principal or calendar collection).
    pub url: String,

    /// Username for authentication.
    pub username: Option<String>,

    /// Password for authentication (supports `pass::`, `env::`,
    /// `secret-tool::` prefixes).
    pub password: Option<String>,

    /// Directory for the downloaded-payload cache.
    pub cache_dir: PathBuf,

    /// Whether to verify TLS certificates.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

fn default_verify_tls() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the default (empty) configuration; an invalid
    /// file is an error.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daybook")
    }

    /// Returns true if at least one provider section is present.
    pub fn has_providers(&self) -> bool {
        self.orgmode.is_some() || self.icalendar.is_some() || self.caldav.is_some()
    }

    /// Validates the configuration without touching any source.
    ///
    /// Checks the constraints serde cannot express: non-empty path lists and
    /// resolvable CalDAV settings (including secret references).
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref orgmode) = self.orgmode
            && orgmode.paths.is_empty()
        {
            return Err("orgmode paths must not be empty".to_string());
        }

        if let Some(ref icalendar) = self.icalendar
            && icalendar.paths.is_empty()
        {
            return Err("icalendar paths must not be empty".to_string());
        }

        if let Some(ref caldav) = self.caldav {
            caldav.to_provider_config()?;
        }

        Ok(())
    }
}

impl CalDavSettings {
    /// Converts to provider configuration, resolving secret references.
    pub fn to_provider_config(&self) -> Result<CalDavConfig, String> {
        let mut config = CalDavConfig::new(&self.url, &self.cache_dir)
            .map_err(|e| format!("invalid caldav url {:?}: {}", self.url, e))?;

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                let password = crate::secret::resolve(password)
                    .map_err(|e| format!("failed to resolve caldav password: {}", e))?;
                config = config.with_credentials(username.clone(), password);
            }
            (None, None) => {}
            _ => {
                return Err(
                    "caldav username and password must be set together".to_string(),
                );
            }
        }

        if !self.verify_tls {
            config = config.with_insecure_tls();
        }

        Ok(config)
    }
}
