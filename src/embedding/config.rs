use std::path::PathBuf;
use std::sync::Arc;

use super::bert::BertEncoder;
use super::error::EmbeddingError;
use super::stub::StubEncoder;
use super::{Encoder, EncoderLoader};

/// Default max tokens per query.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

#[derive(Debug, Clone)]
/// Configuration for the query encoder.
pub struct EncoderConfig {
    /// Directory containing `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: Option<PathBuf>,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// If true, use the deterministic [`StubEncoder`] (no model files required).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            return Ok(());
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        match &self.model_dir {
            None => Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            }),
            Some(dir) if !dir.is_dir() => Err(EmbeddingError::ModelNotFound { path: dir.clone() }),
            Some(_) => Ok(()),
        }
    }
}

impl EncoderLoader for EncoderConfig {
    fn load(&self) -> Result<Arc<dyn Encoder>, EmbeddingError> {
        self.validate()?;

        if self.testing_stub {
            tracing::warn!("Query encoder running in STUB mode (testing only)");
            return Ok(Arc::new(StubEncoder::new()));
        }

        // validate() guarantees model_dir is set outside stub mode
        let dir = self
            .model_dir
            .as_deref()
            .ok_or_else(|| EmbeddingError::InvalidConfig {
                reason: "model_dir is required".to_string(),
            })?;

        Ok(Arc::new(BertEncoder::load(dir, self.max_seq_len)?))
    }
}
