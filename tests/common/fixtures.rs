//! Test fixtures for integration tests.

use std::path::Path;

use lodestar::quantize::quantize;
use lodestar::worker::RawEmbeddingEntry;
use lodestar::EMBEDDING_DIM;

/// Unit vector along `axis`.
pub fn basis(axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; EMBEDDING_DIM];
    v[axis] = 1.0;
    v
}

/// Mostly `axis`, with a small component along `noise_axis`.
pub fn near(axis: usize, noise_axis: usize, noise: f32) -> Vec<f32> {
    let mut v = basis(axis);
    v[noise_axis] = noise;
    v
}

#[derive(Default)]
pub struct EmbeddingSetBuilder {
    entries: Vec<RawEmbeddingEntry>,
}

impl EmbeddingSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry quantized the same way the offline producer does.
    pub fn entry(mut self, identifier: &str, embedding: &[f32]) -> Self {
        let vector = quantize(embedding).expect("fixture embeddings are valid");
        self.entries.push(RawEmbeddingEntry {
            identifier: identifier.to_string(),
            embedding: vector.to_base64(),
        });
        self
    }

    /// Adds `count` entries along axes `first_axis..first_axis + count`.
    pub fn fillers(mut self, prefix: &str, first_axis: usize, count: usize) -> Self {
        for i in 0..count {
            self = self.entry(&format!("{prefix}-{i}"), &basis(first_axis + i));
        }
        self
    }

    pub fn build(self) -> Vec<RawEmbeddingEntry> {
        self.entries
    }

    /// Writes the set as JSON to `root/rel_path`, creating parent directories.
    pub fn write_to(self, root: &Path, rel_path: &str) {
        let path = root.join(rel_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dir");
        }
        let json = serde_json::to_vec_pretty(&self.entries).expect("serialize fixture");
        std::fs::write(path, json).expect("write fixture");
    }
}
