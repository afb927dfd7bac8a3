//! File-backed iCalendar provider.

use std::fs;
use std::path::PathBuf;

use daybook_core::Pipeline;
use tracing::info;

use crate::calendar::dedup::SeenEvents;
use crate::calendar::ics::parse_calendar_lines;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ItemProvider, ItemStream};

/// Journal provider reading one iCalendar file.
pub struct CalendarFileProvider {
    path: PathBuf,
    label: String,
}

impl CalendarFileProvider {
    /// Creates a provider for the calendar file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

impl ItemProvider for CalendarFileProvider {
    fn kind(&self) -> &'static str {
        "icalendar"
    }

    fn source_label(&self) -> &str {
        &self.label
    }

    fn items(&self) -> ProviderResult<ItemStream<'_>> {
        info!(path = %self.label, "reading calendar file");
        let text = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::io(format!(
                "failed to read calendar file {}: {}",
                self.label, e
            ))
            .with_source(e)
            .with_provider(self.kind())
        })?;

        let events = parse_calendar_lines(text.lines().map(str::to_owned))
            .map_err(|e| e.with_provider(self.kind()))?;

        let mut seen = SeenEvents::new();
        let label = self.label.clone();
        let items = Pipeline::start(events.into_iter())
            .then(move |events| events.filter(move |event| seen.insert(event)))
            .then(move |unique| unique.map(move |event| Ok(event.to_item(&label))))
            .finish();
        Ok(Box::new(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use daybook_core::{Item, ItemDate};

    const SAMPLE: &str = "BEGIN:VCALENDAR\n\
VERSION:2.0\n\
BEGIN:VEVENT\n\
UID:a@example.com\n\
DTSTART;VALUE=DATE:20190117\n\
SUMMARY:Holiday\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
UID:a-again@example.com\n\
DTSTART;VALUE=DATE:20190117\n\
SUMMARY:Holiday\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
UID:b@example.com\n\
DTSTART:20190118T090000Z\n\
SUMMARY:Standup\n\
END:VEVENT\n\
END:VCALENDAR\n";

    #[test]
    fn reads_and_deduplicates_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let provider = CalendarFileProvider::new(file.path());
        assert_eq!(provider.kind(), "icalendar");

        let items: Vec<Item> = provider
            .items()
            .unwrap()
            .collect::<ProviderResult<_>>()
            .unwrap();

        let label = provider.source_label();
        assert_eq!(
            items,
            vec![
                Item::new(
                    ItemDate::from_date(chrono::NaiveDate::from_ymd_opt(2019, 1, 17).unwrap()),
                    "Holiday",
                    label
                ),
                Item::new(
                    ItemDate::from_datetime("2019-01-18T09:00:00Z".parse().unwrap()),
                    "Standup",
                    label
                ),
            ]
        );
    }

    #[test]
    fn missing_file_errors_on_open() {
        let provider = CalendarFileProvider::new("/nonexistent/calendar.ics");
        assert!(provider.items().is_err());
    }

    #[test]
    fn malformed_calendar_is_not_an_empty_success() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "BEGIN:VCALENDAR\nBEGIN:VEVENT\nDTSTART").unwrap();

        let provider = CalendarFileProvider::new(file.path());
        assert!(provider.items().is_err());
    }
}
