use std::path::{Path, PathBuf};

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::Encoder;
use super::device::{device_label, select_device};
use super::error::EmbeddingError;
use super::utils::{l2_normalize, load_tokenizer_with_truncation};

/// BERT sentence encoder (CLS pooling, unit-normalized output).
///
/// Expects a model directory with `config.json`, `model.safetensors` and
/// `tokenizer.json`.
pub struct BertEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
}

impl std::fmt::Debug for BertEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEncoder")
            .field("device", &device_label(&self.device))
            .field("hidden_size", &self.hidden_size)
            .finish()
    }
}

impl BertEncoder {
    /// Loads weights, config and tokenizer from `model_dir`.
    pub fn load(model_dir: &Path, max_seq_len: usize) -> Result<Self, EmbeddingError> {
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        for path in [&config_path, &weights_path] {
            if !path.exists() {
                return Err(EmbeddingError::ModelNotFound {
                    path: PathBuf::from(path),
                });
            }
        }

        let device = select_device()?;
        debug!(device = device_label(&device), "Selected device for query encoder");

        let config_content = std::fs::read_to_string(&config_path)?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("Failed to parse {}: {}", config_path.display(), e),
            })?;

        // SAFETY: the safetensors file is opened read-only and not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to map weights: {}", e),
        })?;

        let vb = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            vb.pp("bert")
        } else {
            vb
        };

        let model = BertModel::load(vb, &config).map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to load BERT model: {}", e),
        })?;

        let tokenizer = load_tokenizer_with_truncation(model_dir, max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!(
            model_dir = %model_dir.display(),
            hidden_size = config.hidden_size,
            num_layers = config.num_hidden_layers,
            max_seq_len,
            "Query encoder loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: config.hidden_size,
        })
    }

    fn forward(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            self.tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Err(EmbeddingError::TokenizationFailed {
                reason: "input produced no tokens".to_string(),
            });
        }

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        // [1, seq_len, hidden_size]
        let hidden_states = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))?;

        let mut embedding = hidden_states.i((0, 0))?.to_vec1::<f32>()?;
        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

impl Encoder for BertEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), "Encoding query");
        self.forward(text)
    }

    fn output_dim(&self) -> usize {
        self.hidden_size
    }
}
