//! CalDAV journal provider.

use std::cell::RefCell;

use daybook_core::Item;
use tracing::{debug, info, warn};

use crate::calendar::{CalendarEvent, SeenEvents, parse_calendar_lines};
use crate::error::ProviderResult;
use crate::provider::{ItemProvider, ItemStream};

use super::cache::PayloadCache;
use super::client::CalDavClient;
use super::config::CalDavConfig;
use super::xml::{
    DiscoveredCalendar, calendar_query_body, parse_propfind_response, parse_report_response,
    propfind_calendars_body,
};

/// Journal provider reading one CalDAV server.
///
/// On the first run every event payload is downloaded and written to the
/// payload cache; subsequent runs read the cache and never touch the
/// network. Deduplication is scoped to the server URL, across all payloads
/// and all calendar collections it exposes.
pub struct CalDavProvider {
    config: CalDavConfig,
    cache: PayloadCache,
    /// RefCell because Digest auth advances a nonce counter per request and
    /// the whole pipeline is single-threaded.
    client: RefCell<CalDavClient>,
    label: String,
}

impl CalDavProvider {
    /// Creates a provider for the server described by `config`.
    pub fn new(config: CalDavConfig) -> ProviderResult<Self> {
        let client = CalDavClient::new(config.clone())?;
        let cache = PayloadCache::new(&config.cache_dir);
        let label = config.url.to_string();
        Ok(Self {
            config,
            cache,
            client: RefCell::new(client),
            label,
        })
    }

    /// Discovers calendar collections at the configured URL.
    fn discover_calendars(&self) -> ProviderResult<Vec<DiscoveredCalendar>> {
        let url = self.config.url_str();
        let body = propfind_calendars_body();

        debug!(url = %url, "discovering calendars via PROPFIND");

        let response = self.client.borrow_mut().propfind(url, &body, 1)?;
        let calendars = parse_propfind_response(&response);

        if calendars.is_empty() {
            // The URL might be a direct calendar URL, not a principal.
            debug!("no calendars found via PROPFIND, assuming direct calendar URL");
            return Ok(vec![DiscoveredCalendar {
                href: url.to_string(),
                display_name: None,
            }]);
        }

        info!(count = calendars.len(), "discovered calendars");
        Ok(calendars)
    }

    /// Downloads every event payload and writes the cache.
    fn download_payloads(&self) -> ProviderResult<Vec<String>> {
        let calendars = self.discover_calendars()?;
        let query = calendar_query_body();
        let mut payloads = Vec::new();

        for calendar in calendars {
            let url = resolve_href(&self.config.url, &calendar.href);
            debug!(calendar = %url, "fetching events with REPORT");

            let response = self.client.borrow_mut().report(&url, &query)?;
            let event_data = parse_report_response(&response);
            info!(calendar = %url, count = event_data.len(), "downloaded event payloads");

            for (href, data) in event_data {
                let key = href.rsplit('/').next().unwrap_or(&href);
                if key.is_empty() {
                    warn!(href = %href, "skipping payload with unusable href");
                    continue;
                }
                self.cache.store(key, &data)?;
                payloads.push(data);
            }
        }

        Ok(payloads)
    }
}

impl ItemProvider for CalDavProvider {
    fn kind(&self) -> &'static str {
        "caldav"
    }

    fn source_label(&self) -> &str {
        &self.label
    }

    fn items(&self) -> ProviderResult<ItemStream<'_>> {
        let seen = SeenEvents::new();
        let label = self.label.clone();

        if self.cache.is_populated()? {
            let payloads = self.cache.payloads()?;
            Ok(Box::new(PayloadItems::new(payloads, seen, label)))
        } else {
            info!(url = %self.label, "connecting to CalDAV server");
            let payloads = self
                .download_payloads()
                .map_err(|e| e.with_provider(self.kind()))?;
            Ok(Box::new(PayloadItems::new(
                payloads.into_iter().map(Ok),
                seen,
                label,
            )))
        }
    }
}

/// Resolves a relative href against a base URL.
fn resolve_href(base: &url::Url, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        base.join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}

/// Lazily turns a payload sequence into deduplicated journal items.
///
/// Each payload is unfolded and parsed only when the preceding payloads'
/// events have been consumed. A parse or cache error ends the stream with
/// that error.
struct PayloadItems<P> {
    payloads: P,
    current: std::vec::IntoIter<CalendarEvent>,
    seen: SeenEvents,
    label: String,
    done: bool,
}

impl<P> PayloadItems<P>
where
    P: Iterator<Item = ProviderResult<String>>,
{
    fn new(payloads: P, seen: SeenEvents, label: String) -> Self {
        Self {
            payloads,
            current: Vec::new().into_iter(),
            seen,
            label,
            done: false,
        }
    }
}

impl<P> Iterator for PayloadItems<P>
where
    P: Iterator<Item = ProviderResult<String>>,
{
    type Item = ProviderResult<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            for event in self.current.by_ref() {
                if self.seen.insert(&event) {
                    return Some(Ok(event.to_item(&self.label)));
                }
            }
            match self.payloads.next() {
                Some(Ok(data)) => {
                    match parse_calendar_lines(data.lines().map(str::to_owned)) {
                        Ok(events) => self.current = events.into_iter(),
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_core::ItemDate;

    fn provider_with_cache(dir: &std::path::Path) -> CalDavProvider {
        let config = CalDavConfig::new("https://dav.example.com/calendars/user/", dir).unwrap();
        CalDavProvider::new(config).unwrap()
    }

    fn payload(uid: &str, date: &str, summary: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nUID:{}\nDTSTART;VALUE=DATE:{}\nSUMMARY:{}\nEND:VEVENT\nEND:VCALENDAR\n",
            uid, date, summary
        )
    }

    #[test]
    fn provider_creation() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider_with_cache(dir.path());
        assert_eq!(provider.kind(), "caldav");
        assert_eq!(
            provider.source_label(),
            "https://dav.example.com/calendars/user/"
        );
    }

    #[test]
    fn populated_cache_is_read_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PayloadCache::new(dir.path());
        cache
            .store("a.ics", &payload("a@x", "20190117", "Breakfast"))
            .unwrap();
        cache
            .store("b.ics", &payload("b@x", "20190117", "Breakfast"))
            .unwrap();

        let provider = provider_with_cache(dir.path());
        let items: Vec<Item> = provider
            .items()
            .unwrap()
            .collect::<ProviderResult<_>>()
            .unwrap();

        // The duplicate payload is collapsed; dedup spans payload files.
        assert_eq!(
            items,
            vec![Item::new(
                ItemDate::from_date(chrono::NaiveDate::from_ymd_opt(2019, 1, 17).unwrap()),
                "Breakfast",
                provider.source_label()
            )]
        );
    }

    #[test]
    fn malformed_cached_payload_surfaces_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PayloadCache::new(dir.path());
        cache.store("bad.ics", "BEGIN:VCALENDAR\nDTSTART").unwrap();

        let provider = provider_with_cache(dir.path());
        let results: Vec<ProviderResult<Item>> = provider.items().unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn resolve_relative_href() {
        let base = url::Url::parse("https://dav.example.com/calendars/user/").unwrap();

        assert_eq!(
            resolve_href(&base, "journal/"),
            "https://dav.example.com/calendars/user/journal/"
        );
        assert_eq!(
            resolve_href(&base, "/calendars/user/personal/"),
            "https://dav.example.com/calendars/user/personal/"
        );
        assert_eq!(
            resolve_href(&base, "https://other.example.com/cal/"),
            "https://other.example.com/cal/"
        );
    }
}
