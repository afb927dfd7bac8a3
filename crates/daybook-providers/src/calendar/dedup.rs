//! First-seen-unique event filtering.
//!
//! Calendar exports routinely contain the same event more than once (one
//! payload per calendar collection, overlapping caches). Each source gets
//! one [`SeenEvents`] tracker; an event passes through the first time its
//! identity is seen and is dropped on every later occurrence. Trackers are
//! never shared across sources, so identical events from two different
//! sources both survive.

use std::collections::HashSet;

use super::event::{CalendarEvent, EventStart};

/// Events already emitted for a single source.
///
/// Identity is the decoded name plus the event start: the same
/// representation the public accessors expose, so an event stored once
/// quoted-printable encoded and once plain still counts as a duplicate.
#[derive(Debug, Default)]
pub struct SeenEvents {
    seen: HashSet<(String, EventStart)>,
}

impl SeenEvents {
    /// Creates an empty tracker for one source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the event's identity; returns true the first time it is seen.
    pub fn insert(&mut self, event: &CalendarEvent) -> bool {
        self.seen.insert((event.name(), event.start()))
    }

    /// Number of distinct events seen so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if no event has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
