use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::quantize::EmbeddingVector;

use super::protocol::{RawEmbeddingEntry, WorkerFailure};

/// A decoded embedding-set entry. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEmbeddingEntry {
    pub identifier: String,
    pub vector: EmbeddingVector,
}

/// Worker-owned embedding sets, keyed by namespace (`"archive"`, `"dictionary"`, ...).
///
/// Sets are shared as `Arc<[_]>` so an in-flight query keeps scoring the snapshot it
/// started with even if the key is replaced meanwhile.
#[derive(Debug, Default)]
pub struct EmbeddingStore {
    sets: HashMap<String, Arc<[StoredEmbeddingEntry]>>,
}

impl EmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set for `key` wholesale, returning the previous one.
    pub fn replace(
        &mut self,
        key: impl Into<String>,
        entries: Vec<StoredEmbeddingEntry>,
    ) -> Option<Arc<[StoredEmbeddingEntry]>> {
        self.sets.insert(key.into(), Arc::from(entries))
    }

    pub fn get(&self, key: &str) -> Option<Arc<[StoredEmbeddingEntry]>> {
        self.sets.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sets.contains_key(key)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Number of entries stored under `key` (0 if absent).
    pub fn entry_count(&self, key: &str) -> usize {
        self.sets.get(key).map_or(0, |set| set.len())
    }
}

/// Decodes every entry of a set; the first bad entry fails the whole set.
pub fn decode_entries(
    raw: &[RawEmbeddingEntry],
) -> Result<Vec<StoredEmbeddingEntry>, WorkerFailure> {
    raw.iter()
        .enumerate()
        .map(|(index, entry)| {
            EmbeddingVector::from_base64(&entry.embedding)
                .map(|vector| StoredEmbeddingEntry {
                    identifier: entry.identifier.clone(),
                    vector,
                })
                .map_err(|e| {
                    warn!(
                        index,
                        identifier = %entry.identifier,
                        error = %e,
                        "Rejected undecodable embedding entry"
                    );
                    WorkerFailure::Decode {
                        message: format!("entry {index} ({:?}): {e}", entry.identifier),
                    }
                })
        })
        .collect()
}
