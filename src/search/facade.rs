use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tokio::sync::{OnceCell, broadcast};
use tracing::{debug, info, warn};

use crate::embedding::EncoderLoader;
use crate::scoring::ScoreResult;
use crate::source::{EmbeddingSource, LoadError};
use crate::worker::{WorkerClient, WorkerEvent, WorkerOptions};

use super::error::SearchError;

/// The API the rest of an application consumes.
///
/// Spawns its worker on first use and keeps it for the session. Embedding sets are
/// loaded explicitly with [`ensure_embeddings_loaded`](Self::ensure_embeddings_loaded);
/// [`get_scores`](Self::get_scores) never loads anything by itself.
pub struct SemanticSearch<S> {
    source: S,
    worker: WorkerSlot,
    loaded: Mutex<HashMap<String, Arc<OnceCell<()>>>>,
}

enum WorkerSlot {
    /// Spawned on first use.
    Lazy {
        loader: Arc<dyn EncoderLoader>,
        options: WorkerOptions,
        client: OnceLock<WorkerClient>,
    },
    Attached(WorkerClient),
}

impl WorkerSlot {
    fn get(&self) -> Option<&WorkerClient> {
        match self {
            WorkerSlot::Lazy { client, .. } => client.get(),
            WorkerSlot::Attached(client) => Some(client),
        }
    }

    fn get_or_spawn(&self) -> &WorkerClient {
        match self {
            WorkerSlot::Lazy {
                loader,
                options,
                client,
            } => client.get_or_init(|| {
                debug!(queue_capacity = options.queue_capacity, "Spawning search worker");
                WorkerClient::spawn(Arc::clone(loader), options)
            }),
            WorkerSlot::Attached(client) => client,
        }
    }
}

impl<S> fmt::Debug for SemanticSearch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<String> = self
            .loaded
            .lock()
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(key, _)| key.clone())
            .collect();
        f.debug_struct("SemanticSearch")
            .field("worker", &self.worker.get())
            .field("loaded", &loaded)
            .finish()
    }
}

impl<S: EmbeddingSource> SemanticSearch<S> {
    pub fn new(source: S, loader: Arc<dyn EncoderLoader>, options: WorkerOptions) -> Self {
        Self {
            source,
            worker: WorkerSlot::Lazy {
                loader,
                options,
                client: OnceLock::new(),
            },
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Uses an existing client instead of spawning a worker.
    pub fn from_worker(source: S, worker: WorkerClient) -> Self {
        Self {
            source,
            worker: WorkerSlot::Attached(worker),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the set at `rel_path` into the worker under `key`, once.
    ///
    /// Concurrent and repeated calls for the same key share a single fetch and a single
    /// `setEmbeddings`. On failure the key stays unloaded and a later call retries.
    pub async fn ensure_embeddings_loaded(
        &self,
        key: &str,
        rel_path: &str,
    ) -> Result<bool, SearchError> {
        let cell = {
            let mut loaded = self.loaded.lock();
            Arc::clone(loaded.entry(key.to_string()).or_default())
        };

        if cell.initialized() {
            return Ok(true);
        }

        cell.get_or_try_init(|| self.load_set(key, rel_path))
            .await?;
        Ok(true)
    }

    /// Ranks the set loaded under `key` against `query`.
    ///
    /// Fails with [`SearchError::UnknownKey`] if the set was never loaded.
    pub async fn get_scores(&self, key: &str, query: &str) -> Result<Vec<ScoreResult>, SearchError> {
        self.worker().get_scores(key, query).await
    }

    /// `true` once a worker exists. Its encoder may still be unloaded.
    pub fn is_worker_ready(&self) -> bool {
        self.worker.get().is_some()
    }

    /// `true` once the worker has reported its encoder loaded.
    pub fn is_model_ready(&self) -> bool {
        self.worker.get().is_some_and(WorkerClient::is_model_loaded)
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.loaded
            .lock()
            .get(key)
            .is_some_and(|cell| cell.initialized())
    }

    /// Subscribes to worker notifications (spawns the worker if needed).
    pub fn model_events(&self) -> broadcast::Receiver<WorkerEvent> {
        self.worker().subscribe()
    }

    pub fn worker(&self) -> &WorkerClient {
        self.worker.get_or_spawn()
    }

    async fn load_set(&self, key: &str, rel_path: &str) -> Result<(), SearchError> {
        let entries = self.source.fetch(rel_path).await.inspect_err(|e| {
            warn!(key, rel_path, error = %e, "Embedding set fetch failed");
        })?;
        let count = entries.len();

        self.worker()
            .set_embeddings(key, entries)
            .await
            .map_err(|e| match e {
                SearchError::Decode { reason } => {
                    warn!(key, rel_path, %reason, "Embedding set rejected by worker");
                    SearchError::Load(LoadError::Decode { reason })
                }
                other => other,
            })?;
        info!(key, rel_path, count, "Embedding set loaded");
        Ok(())
    }
}
