use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::worker::RawEmbeddingEntry;

use super::EmbeddingSource;
use super::error::LoadError;

/// In-memory source that counts fetches and can be told to fail.
#[derive(Default, Clone)]
pub struct MockSource {
    sets: Arc<RwLock<HashMap<String, Vec<RawEmbeddingEntry>>>>,
    fetches: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    delay: Duration,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps before answering each fetch, to widen race windows in tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn insert(&self, rel_path: &str, entries: Vec<RawEmbeddingEntry>) {
        self.sets.write().insert(rel_path.to_string(), entries);
    }

    /// While set, every fetch fails with HTTP 503.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl EmbeddingSource for MockSource {
    async fn fetch(&self, rel_path: &str) -> Result<Vec<RawEmbeddingEntry>, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(LoadError::Status {
                status: 503,
                url: rel_path.to_string(),
            });
        }

        self.sets
            .read()
            .get(rel_path)
            .cloned()
            .ok_or_else(|| LoadError::Status {
                status: 404,
                url: rel_path.to_string(),
            })
    }
}
