use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::worker::RawEmbeddingEntry;

use super::EmbeddingSource;
use super::error::LoadError;

/// Reads embedding sets from a local directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `rel_path` under the root, rejecting anything that could escape it.
    pub fn resolve(&self, rel_path: &str) -> Result<PathBuf, LoadError> {
        let rel = sanitize_rel_path(rel_path).ok_or_else(|| {
            warn!(rel_path, "Rejected asset path (path traversal?)");
            LoadError::InvalidPath {
                path: rel_path.to_string(),
                reason: "must be a non-empty relative path without `..`".to_string(),
            }
        })?;
        Ok(self.root.join(rel))
    }
}

impl EmbeddingSource for FileSource {
    async fn fetch(&self, rel_path: &str) -> Result<Vec<RawEmbeddingEntry>, LoadError> {
        let path = self.resolve(rel_path)?;
        debug!(path = %path.display(), "Reading embedding set");

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| LoadError::Io { path, source })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Leading slashes are tolerated (asset paths are written root-relative); `..` and
/// drive prefixes are not.
fn sanitize_rel_path(rel_path: &str) -> Option<PathBuf> {
    let trimmed = rel_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let mut out = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(segment) => out.push(segment),
            Component::CurDir => continue,
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}
