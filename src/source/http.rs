use reqwest::{Client, Url};
use tracing::debug;

use crate::worker::RawEmbeddingEntry;

use super::EmbeddingSource;
use super::error::LoadError;

/// Fetches embedding sets over HTTP(S) relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves `rel_path` against the base URL.
    pub fn url_for(&self, rel_path: &str) -> Result<Url, LoadError> {
        let joined = join_asset_url(&self.base_url, rel_path);
        Url::parse(&joined).map_err(|e| LoadError::InvalidPath {
            path: rel_path.to_string(),
            reason: e.to_string(),
        })
    }
}

impl EmbeddingSource for HttpSource {
    async fn fetch(&self, rel_path: &str) -> Result<Vec<RawEmbeddingEntry>, LoadError> {
        let url = self.url_for(rel_path)?;
        debug!(%url, "Fetching embedding set");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Joins `base` and `rel_path` with exactly one slash between them.
///
/// Runs of slashes inside `rel_path` collapse to one and leading slashes are dropped,
/// so `"/embeddings//archive.json"` and `"embeddings/archive.json"` resolve the same.
pub fn join_asset_url(base: &str, rel_path: &str) -> String {
    let mut rel = String::with_capacity(rel_path.len());
    for segment in rel_path.split('/').filter(|s| !s.is_empty()) {
        if !rel.is_empty() {
            rel.push('/');
        }
        rel.push_str(segment);
    }
    if rel_path.ends_with('/') && !rel.is_empty() {
        rel.push('/');
    }

    format!("{}/{}", base.trim_end_matches('/'), rel)
}
