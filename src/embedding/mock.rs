use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::constants::QUERY_INSTRUCTION;

use super::error::EmbeddingError;
use super::stub::StubEncoder;
use super::{Encoder, EncoderLoader};

/// Scriptable encoder for tests.
///
/// Texts are matched after stripping [`QUERY_INSTRUCTION`]. Unscripted texts fall back
/// to [`StubEncoder`].
#[derive(Default)]
pub struct MockEncoder {
    vectors: HashMap<String, Vec<f32>>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    panics: HashSet<String>,
    calls: AtomicUsize,
    fallback: StubEncoder,
}

impl MockEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `vector` for `text`.
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Blocks the calling thread for `delay` before encoding `text`.
    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Returns an inference error for `text`.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failures.insert(text.to_string());
        self
    }

    /// Panics when asked to encode `text`.
    pub fn panicking_on(mut self, text: &str) -> Self {
        self.panics.insert(text.to_string());
        self
    }

    /// Number of `encode` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Encoder for MockEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = text.strip_prefix(QUERY_INSTRUCTION).unwrap_or(text);

        if let Some(delay) = self.delays.get(key) {
            std::thread::sleep(*delay);
        }

        if self.panics.contains(key) {
            panic!("mock encoder panic for {key:?}");
        }

        if self.failures.contains(key) {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("mock failure for {key:?}"),
            });
        }

        match self.vectors.get(key) {
            Some(vector) => Ok(vector.clone()),
            None => self.fallback.encode(key),
        }
    }

    fn output_dim(&self) -> usize {
        self.vectors
            .values()
            .next()
            .map_or(self.fallback.output_dim(), Vec::len)
    }
}

/// Loader that hands out a shared encoder and counts load attempts.
pub struct MockLoader {
    encoder: Arc<dyn Encoder>,
    delay: Duration,
    failures_remaining: AtomicUsize,
    loads: Arc<AtomicUsize>,
}

impl MockLoader {
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self {
            encoder,
            delay: Duration::ZERO,
            failures_remaining: AtomicUsize::new(0),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Blocks each load attempt for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fails the first `n` load attempts.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Shared counter of load attempts (survives moving the loader into a worker).
    pub fn load_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.loads)
    }
}

impl EncoderLoader for MockLoader {
    fn load(&self) -> Result<Arc<dyn Encoder>, EmbeddingError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: "mock load failure".to_string(),
            });
        }

        Ok(Arc::clone(&self.encoder))
    }
}
