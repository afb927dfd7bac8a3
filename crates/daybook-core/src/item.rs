//! The uniform journal item record.
//!
//! Every provider, whatever its input format, ends up producing a sequence
//! of [`Item`]s: a date, a block of text, and a label identifying the
//! concrete source that produced the entry.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The date a journal item belongs to.
///
/// Outline paragraphs and all-day calendar events carry a bare date; timed
/// calendar events keep their full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ItemDate {
    /// A calendar date with no time-of-day.
    Day(NaiveDate),
    /// A specific point in time, stored in UTC.
    Timestamp(DateTime<Utc>),
}

impl ItemDate {
    /// Creates an `ItemDate::Day` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Day(date)
    }

    /// Creates an `ItemDate::Timestamp` from a UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::Timestamp(dt)
    }

    /// Returns `true` if this is a day-precision date.
    pub fn is_day(&self) -> bool {
        matches!(self, Self::Day(_))
    }

    /// Returns the date if this is a `Day` variant.
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Self::Day(d) => Some(d),
            Self::Timestamp(_) => None,
        }
    }

    /// Returns the datetime if this is a `Timestamp` variant.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(dt) => Some(dt),
            Self::Day(_) => None,
        }
    }

    /// ISO rendering used by the CSV journal: `YYYY-MM-DD` for
    /// day-precision dates, RFC 3339 for timestamps.
    pub fn to_iso_string(&self) -> String {
        match self {
            Self::Day(d) => d.format("%Y-%m-%d").to_string(),
            Self::Timestamp(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

/// One journal entry, as emitted by every provider.
///
/// Items are plain values: immutable once constructed, compared field by
/// field, cloned freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// The date this entry belongs to.
    pub date: ItemDate,
    /// Free-form entry text; may contain embedded line breaks.
    pub text: String,
    /// Identifies the concrete source (file path or server URL).
    pub source_label: String,
}

impl Item {
    /// Creates a new item.
    pub fn new(date: ItemDate, text: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            date,
            text: text.into(),
            source_label: source_label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 1, 17).unwrap()
    }

    fn sample_datetime() -> DateTime<Utc> {
        "2019-01-17T10:30:00Z".parse().unwrap()
    }

    #[test]
    fn item_date_variants() {
        let day = ItemDate::from_date(sample_date());
        assert!(day.is_day());
        assert_eq!(day.as_date(), Some(&sample_date()));
        assert!(day.as_datetime().is_none());

        let ts = ItemDate::from_datetime(sample_datetime());
        assert!(!ts.is_day());
        assert_eq!(ts.as_datetime(), Some(&sample_datetime()));
        assert!(ts.as_date().is_none());
    }

    #[test]
    fn iso_rendering() {
        assert_eq!(
            ItemDate::from_date(sample_date()).to_iso_string(),
            "2019-01-17"
        );
        assert_eq!(
            ItemDate::from_datetime(sample_datetime()).to_iso_string(),
            "2019-01-17T10:30:00+00:00"
        );
    }

    #[test]
    fn item_equality_is_structural() {
        let a = Item::new(ItemDate::from_date(sample_date()), "foo\nbar", "journal.org");
        let b = Item::new(ItemDate::from_date(sample_date()), "foo\nbar", "journal.org");
        let c = Item::new(ItemDate::from_date(sample_date()), "foo\nbar", "other.org");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn serde_roundtrip() {
        let item = Item::new(
            ItemDate::from_datetime(sample_datetime()),
            "lunch with A.",
            "https://dav.example.com/",
        );

        let json = serde_json::to_string(&item).unwrap();
        let parsed: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, parsed);
    }
}
