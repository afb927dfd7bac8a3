//! iCalendar text parsing.
//!
//! This module drives the `icalendar` grammar crate over repaired calendar
//! text and converts every VEVENT into a [`CalendarEvent`]. The grammar
//! itself is not reimplemented or validated here; whatever it rejects is
//! propagated to the caller.

use chrono::{TimeZone, Utc};
use icalendar::{Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, EventLike};
use tracing::debug;

use crate::calendar::event::{CalendarEvent, EventStart};
use crate::calendar::unfold::unfold;
use crate::error::{ProviderError, ProviderResult};

/// Parses unfolded iCalendar text into events.
///
/// # Errors
///
/// A grammar failure aborts the whole payload; malformed calendar text is
/// never skipped over silently.
pub fn parse_calendar(text: &str) -> ProviderResult<Vec<CalendarEvent>> {
    let calendar: Calendar = text
        .parse()
        .map_err(|e: String| ProviderError::parse(format!("invalid iCalendar text: {}", e)))?;

    let events: Vec<CalendarEvent> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => parse_event(event),
            _ => None,
        })
        .collect();

    debug!(count = events.len(), "parsed calendar events");

    Ok(events)
}

/// Repairs `=`-prefix continuations in raw calendar lines, then parses.
pub fn parse_calendar_lines<I>(lines: I) -> ProviderResult<Vec<CalendarEvent>>
where
    I: IntoIterator<Item = String>,
{
    let text = unfold(lines).collect::<Vec<_>>().join("\r\n");
    parse_calendar(&text)
}

/// Converts a single VEVENT component.
///
/// Components without a start time carry no journal date and are skipped.
fn parse_event(event: &icalendar::Event) -> Option<CalendarEvent> {
    let start = convert_start(event.get_start()?);
    let summary = event.get_summary().unwrap_or_default();
    Some(CalendarEvent::new(summary, start))
}

/// Converts the grammar crate's start representation to [`EventStart`].
fn convert_start(dt: DatePerhapsTime) -> EventStart {
    match dt {
        DatePerhapsTime::Date(date) => EventStart::from_date(date),
        DatePerhapsTime::DateTime(cdt) => {
            let utc_dt = match cdt {
                CalendarDateTime::Utc(dt) => dt,
                CalendarDateTime::Floating(naive) => Utc.from_utc_datetime(&naive),
                // Timezone resolution is out of scope; treat the wall time
                // as UTC like the floating case.
                CalendarDateTime::WithTimezone { date_time, tzid: _ } => {
                    Utc.from_utc_datetime(&date_time)
                }
            };
            EventStart::from_datetime(utc_dt)
        }
    }
}
