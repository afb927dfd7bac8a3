//! Normalized calendar event records.
//!
//! [`CalendarEvent`] is what the grammar layer hands back for every VEVENT:
//! the summary as it appeared on the wire (possibly still quoted-printable
//! encoded) plus the event start. Decoding and date collapsing happen here,
//! on access, so the stored record stays faithful to the source.

use chrono::{DateTime, NaiveDate, Utc};
use quoted_printable::ParseMode;
use serde::{Deserialize, Serialize};

use daybook_core::{Item, ItemDate};

/// When a calendar event starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventStart {
    /// A specific point in time, stored in UTC.
    Timed(DateTime<Utc>),
    /// An all-day event date (no specific time).
    AllDay(NaiveDate),
}

impl EventStart {
    /// Creates an `EventStart` from a UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::Timed(dt)
    }

    /// Creates an `EventStart` from a date (all-day event).
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns true for all-day starts.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }
}

/// One parsed calendar event.
///
/// Constructed once per VEVENT component and consumed immediately, either to
/// produce an [`Item`] or to test uniqueness; never mutated afterwards.
///
/// Multi-day events are not treated specially: only the start is kept, which
/// under-represents events spanning several days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    raw_name: String,
    start: EventStart,
}

impl CalendarEvent {
    /// Creates a new event from its wire-format summary and start.
    pub fn new(raw_name: impl Into<String>, start: EventStart) -> Self {
        Self {
            raw_name: raw_name.into(),
            start,
        }
    }

    /// The summary exactly as extracted from the grammar, still
    /// content-transfer-encoded.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// The decoded event name.
    ///
    /// Quoted-printable decoding is best-effort: any decode or UTF-8 failure
    /// falls back to the raw string. Plain-ASCII names fail the strict
    /// decoder routinely, so a fallback here is expected, not an error.
    pub fn name(&self) -> String {
        match quoted_printable::decode(self.raw_name.as_bytes(), ParseMode::Strict) {
            Ok(bytes) => {
                String::from_utf8(bytes).unwrap_or_else(|_| self.raw_name.clone())
            }
            Err(_) => self.raw_name.clone(),
        }
    }

    /// The event start.
    pub fn start(&self) -> EventStart {
        self.start
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// The single date this event is journaled under: the bare date for
    /// all-day events, the full timestamp otherwise.
    pub fn representative_date(&self) -> ItemDate {
        match self.start {
            EventStart::AllDay(date) => ItemDate::from_date(date),
            EventStart::Timed(dt) => ItemDate::from_datetime(dt),
        }
    }

    /// Converts the event into a journal item tagged with `source_label`.
    pub fn to_item(&self, source_label: &str) -> Item {
        Item::new(self.representative_date(), self.name(), source_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_datetime() -> DateTime<Utc> {
        "2019-01-17T10:00:00Z".parse().unwrap()
    }

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 1, 17).unwrap()
    }

    #[test]
    fn decodes_quoted_printable_names() {
        let event = CalendarEvent::new("Caf=C3=A9", EventStart::from_date(sample_date()));
        assert_eq!(event.name(), "Café");
        assert_eq!(event.raw_name(), "Caf=C3=A9");
    }

    #[test]
    fn invalid_encoding_falls_back_to_raw() {
        // "=ZZ" is not a valid escape; the raw string comes back untouched.
        let event = CalendarEvent::new("Budget =ZZ review", EventStart::from_date(sample_date()));
        assert_eq!(event.name(), "Budget =ZZ review");
    }

    #[test]
    fn truncated_escape_falls_back_to_raw() {
        let event = CalendarEvent::new("Dinner =C", EventStart::from_date(sample_date()));
        assert_eq!(event.name(), "Dinner =C");
    }

    #[test]
    fn plain_names_pass_through() {
        let event = CalendarEvent::new("Team meeting", EventStart::from_datetime(sample_datetime()));
        assert_eq!(event.name(), "Team meeting");
    }

    #[test]
    fn all_day_events_collapse_to_a_date() {
        let event = CalendarEvent::new("Holiday", EventStart::from_date(sample_date()));
        assert!(event.is_all_day());
        assert_eq!(
            event.representative_date(),
            ItemDate::from_date(sample_date())
        );
    }

    #[test]
    fn timed_events_keep_their_timestamp() {
        let event = CalendarEvent::new("Standup", EventStart::from_datetime(sample_datetime()));
        assert!(!event.is_all_day());
        assert_eq!(
            event.representative_date(),
            ItemDate::from_datetime(sample_datetime())
        );
    }

    #[test]
    fn serde_roundtrip() {
        let event = CalendarEvent::new("Caf=C3=A9", EventStart::from_datetime(sample_datetime()));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: CalendarEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn to_item_uses_decoded_name() {
        let event = CalendarEvent::new("Caf=C3=A9", EventStart::from_date(sample_date()));
        let item = event.to_item("calendar.ics");
        assert_eq!(item.text, "Café");
        assert_eq!(item.source_label, "calendar.ics");
        assert_eq!(item.date, ItemDate::from_date(sample_date()));
    }
}
