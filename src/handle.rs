use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::info;

use crate::config::IndexConfig;
use crate::errors::LoadError;
use crate::index::term_index::TermIndex;
use crate::models::{CategoryFilter, Entry};

/// Serving wrapper around the current [`TermIndex`].
///
/// Lookups snapshot the index and run without holding any lock, so they may
/// run concurrently from any number of threads. `reload` builds a complete
/// replacement off to the side and swaps it in atomically: a concurrent
/// reader observes either the old corpus or the new one, never a partially
/// built index. A reload that fails leaves the previous index serving.
pub struct IndexHandle {
    current: RwLock<Arc<TermIndex>>,
}

impl IndexHandle {
    pub fn new(index: TermIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Build the initial index and wrap it.
    pub fn build(
        config: IndexConfig,
        records: &[Value],
        synonyms: &HashMap<String, String>,
    ) -> Result<Self, LoadError> {
        Ok(Self::new(TermIndex::build(config, records, synonyms)?))
    }

    /// Snapshot of the currently serving index.
    pub fn snapshot(&self) -> Arc<TermIndex> {
        self.current.read().unwrap().clone()
    }

    pub fn lookup(&self, identifier: &str, filter: &CategoryFilter) -> Entry {
        self.snapshot().search(identifier, filter)
    }

    /// Rebuild the index wholesale from new inputs and swap it in.
    pub fn reload(
        &self,
        config: IndexConfig,
        records: &[Value],
        synonyms: &HashMap<String, String>,
    ) -> Result<(), LoadError> {
        let replacement = TermIndex::build(config, records, synonyms)?;
        let mut current = self.current.write().unwrap();
        *current = Arc::new(replacement);
        info!(records = records.len(), "term index reloaded");
        Ok(())
    }
}
