//! CSV journal sink.
//!
//! Every item becomes one CSV record: ISO date, provider kind, source label,
//! text. The file is opened in append mode so repeated runs extend the same
//! journal.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use daybook_core::Item;

/// Writes journal items as CSV records.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl CsvSink<File> {
    /// Opens the journal at `path` for appending, creating it if needed.
    pub fn open_append(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps any writer (used by tests).
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new().from_writer(inner),
        }
    }

    /// Appends one item, tagged with the provider kind that produced it.
    pub fn append(&mut self, kind: &str, item: &Item) -> Result<(), csv::Error> {
        self.writer.write_record([
            item.date.to_iso_string().as_str(),
            kind,
            item.source_label.as_str(),
            item.text.as_str(),
        ])
    }

    /// Flushes buffered records to the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use daybook_core::ItemDate;

    fn render(items: &[(&str, Item)]) -> String {
        let mut sink = CsvSink::from_writer(Vec::new());
        for (kind, item) in items {
            sink.append(kind, item).unwrap();
        }
        sink.flush().unwrap();
        String::from_utf8(sink.writer.into_inner().unwrap()).unwrap()
    }

    fn day(d: u32) -> ItemDate {
        ItemDate::from_date(NaiveDate::from_ymd_opt(2019, 1, d).unwrap())
    }

    #[test]
    fn records_have_four_columns() {
        let out = render(&[(
            "orgmode",
            Item::new(day(17), "foo", "journal.org"),
        )]);
        assert_eq!(out, "2019-01-17,orgmode,journal.org,foo\n");
    }

    #[test]
    fn multiline_text_is_quoted() {
        let out = render(&[(
            "orgmode",
            Item::new(day(17), "foo\nbar", "journal.org"),
        )]);
        assert_eq!(out, "2019-01-17,orgmode,journal.org,\"foo\nbar\"\n");
    }

    #[test]
    fn timestamps_render_rfc3339() {
        let item = Item::new(
            ItemDate::from_datetime("2019-01-18T09:00:00Z".parse().unwrap()),
            "Standup",
            "https://dav.example.com/",
        );
        let out = render(&[("caldav", item)]);
        assert_eq!(
            out,
            "2019-01-18T09:00:00+00:00,caldav,https://dav.example.com/,Standup\n"
        );
    }

    #[test]
    fn appending_to_a_file_extends_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");

        for text in ["first", "second"] {
            let mut sink = CsvSink::open_append(&path).unwrap();
            sink.append("orgmode", &Item::new(day(17), text, "j.org"))
                .unwrap();
            sink.flush().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "2019-01-17,orgmode,j.org,first\n2019-01-17,orgmode,j.org,second\n"
        );
    }
}
