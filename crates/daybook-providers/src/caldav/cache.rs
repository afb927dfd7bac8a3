//! On-disk cache of downloaded event payloads.
//!
//! One file per event payload, named after the last segment of the event's
//! href. A populated cache directory means the server is not contacted at
//! all on the next run; deleting the directory forces a fresh download.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

/// Disk cache holding raw calendar payload strings.
#[derive(Debug)]
pub struct PayloadCache {
    dir: PathBuf,
}

impl PayloadCache {
    /// Creates a cache rooted at `dir`. The directory is created lazily on
    /// the first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns true if the cache directory exists and holds at least one
    /// payload file.
    pub fn is_populated(&self) -> ProviderResult<bool> {
        if !self.dir.is_dir() {
            return Ok(false);
        }
        let mut entries = fs::read_dir(&self.dir).map_err(|e| {
            ProviderError::cache(format!(
                "failed to read cache directory {}: {}",
                self.dir.display(),
                e
            ))
            .with_source(e)
        })?;
        Ok(entries.any(|entry| {
            entry
                .map(|e| e.path().is_file())
                .unwrap_or(false)
        }))
    }

    /// Returns a lazy iterator over the cached payloads.
    ///
    /// Files are read one at a time as the iterator is pulled.
    pub fn payloads(&self) -> ProviderResult<Payloads> {
        info!(dir = %self.dir.display(), "reading payload cache");
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            ProviderError::cache(format!(
                "failed to read cache directory {}: {}",
                self.dir.display(),
                e
            ))
            .with_source(e)
        })?;
        Ok(Payloads { entries })
    }

    /// Stores one payload under `key`.
    ///
    /// # Errors
    ///
    /// Refuses to overwrite an existing entry; a key collision means the
    /// cache directory is in an unexpected state and continuing would
    /// silently drop data.
    pub fn store(&self, key: &str, data: &str) -> ProviderResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ProviderError::cache(format!(
                "failed to create cache directory {}: {}",
                self.dir.display(),
                e
            ))
            .with_source(e)
        })?;

        let path = self.dir.join(key);
        if path.exists() {
            return Err(ProviderError::cache(format!(
                "cache file {} already exists",
                path.display()
            )));
        }

        debug!(path = %path.display(), "writing payload cache entry");
        fs::write(&path, data).map_err(|e| {
            ProviderError::cache(format!(
                "failed to write cache file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })
    }
}

/// Lazy iterator over cached payload strings.
pub struct Payloads {
    entries: fs::ReadDir,
}

impl Iterator for Payloads {
    type Item = ProviderResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(ProviderError::cache(format!(
                        "failed to list cache entry: {}",
                        e
                    ))
                    .with_source(e)));
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            return Some(fs::read_to_string(&path).map_err(|e| {
                ProviderError::cache(format!(
                    "failed to read cache file {}: {}",
                    path.display(),
                    e
                ))
                .with_source(e)
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_is_not_populated() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PayloadCache::new(dir.path().join("missing"));
        assert!(!cache.is_populated().unwrap());

        let cache = PayloadCache::new(dir.path());
        assert!(!cache.is_populated().unwrap());
    }

    #[test]
    fn store_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PayloadCache::new(dir.path().join("events"));

        cache.store("event1.ics", "BEGIN:VCALENDAR").unwrap();
        cache.store("event2.ics", "BEGIN:VCALENDAR2").unwrap();

        assert!(cache.is_populated().unwrap());

        let mut payloads: Vec<String> = cache
            .payloads()
            .unwrap()
            .collect::<ProviderResult<_>>()
            .unwrap();
        payloads.sort();
        assert_eq!(payloads, vec!["BEGIN:VCALENDAR", "BEGIN:VCALENDAR2"]);
    }

    #[test]
    fn store_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PayloadCache::new(dir.path());

        cache.store("event1.ics", "first").unwrap();
        let result = cache.store("event1.ics", "second");
        assert!(result.is_err());

        // The original payload is untouched.
        let payloads: Vec<String> = cache
            .payloads()
            .unwrap()
            .collect::<ProviderResult<_>>()
            .unwrap();
        assert_eq!(payloads, vec!["first"]);
    }
}
