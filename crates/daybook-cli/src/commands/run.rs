//! The ingestion driver.
//!
//! Builds one provider per configured source, pulls each provider's item
//! sequence, and appends everything to the CSV journal. The first source
//! failure aborts the run; rows already appended stay in place (the journal
//! is append-only), but the failure is reported, never swallowed.

use std::path::Path;

use tracing::info;

use daybook_providers::caldav::CalDavProvider;
use daybook_providers::{CalendarFileProvider, ItemProvider, OutlineProvider};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::sink::CsvSink;

/// Runs every configured provider and appends its items to `output`.
pub fn run(config: &AppConfig, output: &Path) -> AppResult<()> {
    let providers = build_providers(config)?;
    if providers.is_empty() {
        return Err(AppError::Config(
            "no providers configured; add an [orgmode], [icalendar] or [caldav] section"
                .to_string(),
        ));
    }

    let mut sink = CsvSink::open_append(output)?;

    for provider in &providers {
        info!(
            kind = provider.kind(),
            source = provider.source_label(),
            "ingesting source"
        );

        let mut count = 0usize;
        for item in provider.items()? {
            let item = item?;
            sink.append(provider.kind(), &item)?;
            count += 1;
        }
        sink.flush()?;

        info!(
            kind = provider.kind(),
            source = provider.source_label(),
            count,
            "appended items"
        );
    }

    Ok(())
}

/// Builds the provider list from the configuration, in section order.
fn build_providers(config: &AppConfig) -> AppResult<Vec<Box<dyn ItemProvider>>> {
    let mut providers: Vec<Box<dyn ItemProvider>> = Vec::new();

    if let Some(ref orgmode) = config.orgmode {
        for path in &orgmode.paths {
            providers.push(Box::new(OutlineProvider::new(path)));
        }
    }

    if let Some(ref icalendar) = config.icalendar {
        for path in &icalendar.paths {
            providers.push(Box::new(CalendarFileProvider::new(path)));
        }
    }

    if let Some(ref caldav) = config.caldav {
        let provider_config = caldav.to_provider_config().map_err(AppError::Config)?;
        providers.push(Box::new(CalDavProvider::new(provider_config)?));
    }

    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::config::{IcalendarSettings, OrgmodeSettings};

    #[test]
    fn no_providers_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("journal.csv");

        let result = run(&AppConfig::default(), &output);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn end_to_end_outline_and_calendar() {
        let dir = tempfile::tempdir().unwrap();

        let org_path = dir.path().join("journal.org");
        std::fs::write(&org_path, "* <2019-01-17 Thu>\n\nfoo\nbar\n").unwrap();

        let ics_path = dir.path().join("export.ics");
        std::fs::write(
            &ics_path,
            "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nUID:a@x\n\
             DTSTART;VALUE=DATE:20190118\nSUMMARY:Holiday\nEND:VEVENT\nEND:VCALENDAR\n",
        )
        .unwrap();

        let config = AppConfig {
            orgmode: Some(OrgmodeSettings {
                paths: vec![org_path.clone()],
            }),
            icalendar: Some(IcalendarSettings {
                paths: vec![ics_path.clone()],
            }),
            ..Default::default()
        };

        let output = dir.path().join("journal.csv");
        run(&config, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            content,
            format!(
                "2019-01-17,orgmode,{},\"foo\nbar\"\n2019-01-18,icalendar,{},Holiday\n",
                org_path.display(),
                ics_path.display()
            )
        );
    }

    #[test]
    fn failing_source_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig {
            orgmode: Some(OrgmodeSettings {
                paths: vec![PathBuf::from("/nonexistent/journal.org")],
            }),
            ..Default::default()
        };

        let output = dir.path().join("journal.csv");
        assert!(run(&config, &output).is_err());
    }

    #[test]
    fn malformed_heading_aborts_mid_source() {
        let dir = tempfile::tempdir().unwrap();

        let org_path = dir.path().join("journal.org");
        std::fs::write(&org_path, "* <2019-01-17 Thu>\n\nok\n\n* <garbage>\n").unwrap();

        let config = AppConfig {
            orgmode: Some(OrgmodeSettings {
                paths: vec![org_path],
            }),
            ..Default::default()
        };

        let output = dir.path().join("journal.csv");
        let result = run(&config, &output);
        assert!(matches!(result, Err(AppError::Provider(_))));
    }
}
