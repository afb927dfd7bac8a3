//! Outline document parsing.
//!
//! An outline document is a plain-text file where heading lines of the form
//! `* <2019-01-17 Thu>` date everything below them, and blank lines separate
//! paragraphs. The parser reconstructs date-stamped multi-line paragraphs
//! from that format, one [`Item`] per paragraph.

use std::io;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use daybook_core::{Item, ItemDate};

use crate::error::{ProviderError, ProviderResult};

/// Matches a heading line once surrounding whitespace has been stripped.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\* <(.+)>$").expect("invalid heading regex"));

/// Weekday abbreviations accepted in headings. The token is part of the
/// required heading shape but is never cross-checked against the date.
const WEEKDAY_ABBREVS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Parses the bracketed heading content, `YYYY-MM-DD Ddd`.
///
/// # Errors
///
/// A heading-like line whose content does not parse is fatal for the whole
/// document; there is no safe way to resynchronize after a bad heading.
fn parse_heading_date(content: &str) -> ProviderResult<NaiveDate> {
    let (date_part, weekday) = content.split_once(' ').ok_or_else(|| {
        ProviderError::parse(format!("malformed heading date {:?}", content))
    })?;

    if !WEEKDAY_ABBREVS
        .iter()
        .any(|w| w.eq_ignore_ascii_case(weekday))
    {
        return Err(ProviderError::parse(format!(
            "malformed heading date {:?}: {:?} is not a weekday abbreviation",
            content, weekday
        )));
    }

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        ProviderError::parse(format!("malformed heading date {:?}: {}", content, e))
    })
}

/// A streaming parser turning outline text lines into dated paragraphs.
///
/// The parser is a small state machine: the date of the most recent heading,
/// plus the non-blank lines accumulated since the last flush. A paragraph is
/// flushed on every blank line and at end of input, and is emitted only when
/// a heading has already been seen and at least one line has accumulated.
/// Lines before the first heading are dropped without warning.
pub struct OutlineParser<I> {
    lines: I,
    source_label: String,
    current_date: Option<NaiveDate>,
    current_paragraph: Vec<String>,
    done: bool,
}

impl<I> OutlineParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Creates a parser over a line sequence, tagging every emitted item
    /// with `source_label`.
    pub fn new(lines: I, source_label: impl Into<String>) -> Self {
        Self {
            lines,
            source_label: source_label.into(),
            current_date: None,
            current_paragraph: Vec::new(),
            done: false,
        }
    }

    /// Emits the accumulated paragraph, if there is one to emit.
    fn flush(&mut self) -> Option<Item> {
        let date = self.current_date?;
        if self.current_paragraph.is_empty() {
            return None;
        }
        let text = self.current_paragraph.join("\n");
        self.current_paragraph.clear();
        Some(Item::new(
            ItemDate::from_date(date),
            text,
            self.source_label.clone(),
        ))
    }
}

impl<I> Iterator for OutlineParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = ProviderResult<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    let clean = line.trim();
                    if !clean.is_empty() {
                        if let Some(caps) = HEADING_RE.captures(clean) {
                            match parse_heading_date(&caps[1]) {
                                Ok(date) => self.current_date = Some(date),
                                Err(e) => {
                                    self.done = true;
                                    return Some(Err(e));
                                }
                            }
                        } else if self.current_date.is_some() {
                            self.current_paragraph.push(clean.to_string());
                        }
                        // Flush decisions happen only on blank lines and at
                        // end of input.
                        continue;
                    }
                    if let Some(item) = self.flush() {
                        return Some(Ok(item));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(ProviderError::io(format!(
                        "failed to read outline line: {}",
                        e
                    ))
                    .with_source(e)));
                }
                None => {
                    self.done = true;
                    return self.flush().map(Ok);
                }
            }
        }
    }
}
