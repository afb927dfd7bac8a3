//! ItemProvider trait definition.
//!
//! This module defines [`ItemProvider`], the core abstraction for journal
//! sources. A provider wraps exactly one source (one outline file, one
//! iCalendar file, one CalDAV server) and exposes its entries as a lazy
//! sequence of [`Item`]s.

use daybook_core::Item;

use crate::error::ProviderResult;

/// A lazily evaluated sequence of items from one source.
///
/// Consumers pull one item at a time; each pull performs just enough
/// upstream work (file reads, parsing) to produce it. An `Err` element
/// means the source failed mid-stream and the sequence ends there.
pub type ItemStream<'a> = Box<dyn Iterator<Item = ProviderResult<Item>> + 'a>;

/// The core abstraction for journal sources.
///
/// # Implementation Notes
///
/// - `items()` acquires the underlying resource (file handle, network
///   connection) and releases it when the returned iterator is dropped.
/// - Each call processes the source end to end, independently of any other
///   provider or any previous call; providers share no state.
/// - A provider must not swallow a source failure: a parse or I/O error is
///   surfaced as an `Err` element, never as a silently shortened sequence.
pub trait ItemProvider {
    /// Returns the provider kind (e.g., "orgmode", "icalendar", "caldav").
    fn kind(&self) -> &'static str;

    /// Identifies the concrete source (file path or server URL).
    fn source_label(&self) -> &str;

    /// Opens the source and returns its lazy item sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened at all; errors during
    /// iteration are reported as `Err` elements of the stream.
    fn items(&self) -> ProviderResult<ItemStream<'_>>;
}
