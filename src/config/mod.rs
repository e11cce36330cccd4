//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `LODESTAR_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::embedding::{DEFAULT_MAX_SEQ_LEN, EncoderConfig};
use crate::source::AssetSource;
use crate::worker::{DEFAULT_QUEUE_CAPACITY, WorkerOptions};

/// Runtime configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LODESTAR_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Query encoder directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    /// `None` runs the deterministic stub encoder.
    pub model_path: Option<PathBuf>,

    /// Base URL (`http(s)://…`) or directory that embedding-set paths are relative to.
    /// Default: `./public`.
    pub asset_base: String,

    /// Worker request mailbox capacity. Default: `64`.
    pub queue_capacity: usize,

    /// Load the encoder when the worker spawns instead of on first query. Default: `false`.
    pub preload_model: bool,

    /// Max query tokens fed to the encoder. Default: `512`.
    pub max_seq_len: usize,
}

/// Default asset base used when `LODESTAR_ASSET_BASE` is not set.
pub const DEFAULT_ASSET_BASE: &str = "./public";

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            asset_base: DEFAULT_ASSET_BASE.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            preload_model: false,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

impl Config {
    const ENV_MODEL_PATH: &'static str = "LODESTAR_MODEL_PATH";
    const ENV_ASSET_BASE: &'static str = "LODESTAR_ASSET_BASE";
    const ENV_QUEUE_CAPACITY: &'static str = "LODESTAR_QUEUE_CAPACITY";
    const ENV_PRELOAD_MODEL: &'static str = "LODESTAR_PRELOAD_MODEL";
    const ENV_MAX_SEQ_LEN: &'static str = "LODESTAR_MAX_SEQ_LEN";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let asset_base = Self::parse_string_from_env(Self::ENV_ASSET_BASE, defaults.asset_base);
        let queue_capacity =
            Self::parse_usize_from_env(Self::ENV_QUEUE_CAPACITY, defaults.queue_capacity)?;
        let preload_model =
            Self::parse_bool_from_env(Self::ENV_PRELOAD_MODEL, defaults.preload_model)?;
        let max_seq_len = Self::parse_usize_from_env(Self::ENV_MAX_SEQ_LEN, defaults.max_seq_len)?;

        Ok(Self {
            model_path,
            asset_base,
            queue_capacity,
            preload_model,
            max_seq_len,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_QUEUE_CAPACITY,
            });
        }

        if self.max_seq_len == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_MAX_SEQ_LEN,
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if !self.asset_base_is_url() {
            let base = PathBuf::from(&self.asset_base);
            if base.exists() && !base.is_dir() {
                return Err(ConfigError::NotADirectory { path: base });
            }
        }

        Ok(())
    }

    pub fn asset_base_is_url(&self) -> bool {
        self.asset_base.starts_with("http://") || self.asset_base.starts_with("https://")
    }

    /// Encoder settings; stub mode when no model path is configured.
    pub fn encoder_config(&self) -> EncoderConfig {
        match &self.model_path {
            Some(path) => EncoderConfig::new(path).with_max_seq_len(self.max_seq_len),
            None => EncoderConfig::stub(),
        }
    }

    pub fn worker_options(&self) -> WorkerOptions {
        WorkerOptions {
            queue_capacity: self.queue_capacity,
            preload: self.preload_model,
        }
    }

    pub fn asset_source(&self) -> AssetSource {
        AssetSource::from_base(&self.asset_base)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ConfigError::InvalidBool {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
