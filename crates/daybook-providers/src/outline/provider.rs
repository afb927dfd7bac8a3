//! File-backed outline provider.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use tracing::info;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ItemProvider, ItemStream};

use super::parser::OutlineParser;

/// Journal provider reading one outline file.
pub struct OutlineProvider {
    path: PathBuf,
    label: String,
}

impl OutlineProvider {
    /// Creates a provider for the outline file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

impl ItemProvider for OutlineProvider {
    fn kind(&self) -> &'static str {
        "orgmode"
    }

    fn source_label(&self) -> &str {
        &self.label
    }

    fn items(&self) -> ProviderResult<ItemStream<'_>> {
        info!(path = %self.label, "reading outline file");
        let file = File::open(&self.path).map_err(|e| {
            ProviderError::io(format!("failed to open outline file {}: {}", self.label, e))
                .with_source(e)
                .with_provider(self.kind())
        })?;
        let lines = BufReader::new(file).lines();
        Ok(Box::new(OutlineParser::new(lines, self.label.clone())))
    }
}
