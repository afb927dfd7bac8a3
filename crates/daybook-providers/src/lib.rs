//! Journal source providers.
//!
//! This crate turns heterogeneous journal sources into the uniform
//! [`Item`](daybook_core::Item) sequence the rest of the system consumes:
//!
//! - [`ItemProvider`] - the trait every source implementation satisfies
//! - [`outline`] - blank-line-delimited outline files with dated headings
//! - [`calendar`] - iCalendar files (continuation repair, grammar parsing,
//!   name decoding, per-source deduplication)
//! - [`caldav`] - CalDAV servers, with an on-disk payload cache
//! - [`ProviderError`] - error types for source ingestion
//!
//! # Architecture
//!
//! ```text
//! outline file          .ics file           CalDAV server
//!      │                    │                     │
//!      ▼                    ▼                     ▼
//! OutlineParser         unfold ──► parse_calendar ◄── cache / download
//!      │                          │
//!      │                          ▼
//!      │                    CalendarEvent ──► SeenEvents (per source)
//!      │                          │
//!      └──────────┬───────────────┘
//!                 ▼
//!               Item
//! ```
//!
//! Every sequence is lazy: a consumer pulls one item at a time and the
//! provider performs just enough upstream work to produce it.

pub mod calendar;
#[cfg(feature = "caldav")]
pub mod caldav;
pub mod error;
pub mod outline;
pub mod provider;

// Re-export main types at crate root
pub use calendar::{CalendarEvent, CalendarFileProvider, EventStart, SeenEvents};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use outline::{OutlineParser, OutlineProvider};
pub use provider::{ItemProvider, ItemStream};
