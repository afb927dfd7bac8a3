//! iCalendar file provider and shared calendar machinery.
//!
//! The pieces here are reused by the CalDAV provider as well:
//!
//! - [`unfold`] repairs the `=`-prefix line continuations the source
//!   calendar exports carry
//! - [`parse_calendar`] / [`parse_calendar_lines`] drive the grammar crate
//! - [`CalendarEvent`] normalizes names and dates
//! - [`SeenEvents`] keeps each source's output first-seen-unique

mod dedup;
mod event;
mod ics;
mod provider;
mod unfold;

pub use dedup::SeenEvents;
pub use event::{CalendarEvent, EventStart};
pub use ics::{parse_calendar, parse_calendar_lines};
pub use provider::CalendarFileProvider;
pub use unfold::{Unfold, unfold};
