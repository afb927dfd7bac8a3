//! CalDAV journal provider.
//!
//! Fetches every event from a CalDAV server and journals it, caching the
//! raw payloads on disk so repeated runs stay offline.
//!
//! # Features
//!
//! - HTTP Digest and Basic authentication
//! - PROPFIND for calendar discovery
//! - REPORT (calendar-query) over all VEVENTs, no time window
//! - One-file-per-payload disk cache, read before any network use
//! - TLS configuration (can be disabled for testing)
//!
//! # Example
//!
//! ```ignore
//! use daybook_providers::caldav::{CalDavConfig, CalDavProvider};
//!
//! let config = CalDavConfig::new("https://dav.example.com/calendars/user/", cache_dir)?
//!     .with_credentials("user", "password");
//!
//! let provider = CalDavProvider::new(config)?;
//! for item in provider.items()? {
//!     println!("{:?}", item?);
//! }
//! ```

mod auth;
mod cache;
mod client;
mod config;
mod provider;
mod xml;

pub use cache::PayloadCache;
pub use config::CalDavConfig;
pub use provider::CalDavProvider;
