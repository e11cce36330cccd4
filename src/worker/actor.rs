use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::constants::QUERY_INSTRUCTION;
use crate::embedding::{Encoder, EncoderLoader};
use crate::quantize::quantize;
use crate::scoring::{ScoreResult, cosine_similarity_i8, select_scores};

use super::model::ModelSlot;
use super::protocol::{RawEmbeddingEntry, Request, RequestId, Response, WorkerFailure};
use super::store::{EmbeddingStore, StoredEmbeddingEntry, decode_entries};

/// Default request mailbox capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Bound of the request channel; senders wait when it is full.
    pub queue_capacity: usize,
    /// Start loading the encoder as soon as the worker spawns instead of on first query.
    pub preload: bool,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            preload: false,
        }
    }
}

/// Channel ends handed back by [`Worker::spawn`].
pub struct WorkerHandle {
    pub requests: mpsc::Sender<Request>,
    pub responses: mpsc::UnboundedReceiver<Response>,
    pub task: JoinHandle<()>,
}

/// The isolated execution context that owns the encoder and every embedding set.
///
/// Messages are taken one at a time in arrival order. `setEmbeddings` completes inline;
/// `getScores` snapshots the key's set and scores on the blocking pool, so several
/// queries can be in flight and may complete out of issue order.
///
/// A panic in any query task ends the worker. Dropping the response sender is how the
/// client learns about it.
pub struct Worker {
    requests: mpsc::Receiver<Request>,
    responses: mpsc::UnboundedSender<Response>,
    store: EmbeddingStore,
    model: ModelSlot,
    tasks: JoinSet<()>,
}

impl Worker {
    pub fn new(
        loader: Arc<dyn EncoderLoader>,
        requests: mpsc::Receiver<Request>,
        responses: mpsc::UnboundedSender<Response>,
    ) -> Self {
        Self {
            model: ModelSlot::new(loader, responses.clone()),
            requests,
            responses,
            store: EmbeddingStore::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Spawns a worker onto the current runtime.
    pub fn spawn(loader: Arc<dyn EncoderLoader>, options: &WorkerOptions) -> WorkerHandle {
        let (request_tx, request_rx) = mpsc::channel(options.queue_capacity.max(1));
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let worker = Worker::new(loader, request_rx, response_tx);
        let task = tokio::spawn(worker.run(options.preload));

        WorkerHandle {
            requests: request_tx,
            responses: response_rx,
            task,
        }
    }

    pub async fn run(mut self, preload: bool) {
        info!(preload, "Search worker started");

        if preload {
            let model = self.model.clone();
            self.tasks.spawn(async move {
                if let Err(e) = model.get().await {
                    warn!(error = %e, "Encoder preload failed; will retry on first query");
                }
            });
        }

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break,
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined
                        && e.is_panic()
                    {
                        error!(error = %e, "Search worker task panicked; shutting down");
                        return;
                    }
                }
            }
        }

        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined
                && e.is_panic()
            {
                error!(error = %e, "Search worker task panicked during shutdown");
                return;
            }
        }

        debug!(sets = self.store.len(), "Search worker stopped");
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::SetEmbeddings {
                request_id,
                key,
                entries,
            } => {
                let response = self.set_embeddings(request_id, key, &entries);
                self.send(response);
            }
            Request::GetScores {
                request_id,
                key,
                query,
            } => self.get_scores(request_id, key, query),
        }
    }

    fn set_embeddings(
        &mut self,
        request_id: RequestId,
        key: String,
        entries: &[RawEmbeddingEntry],
    ) -> Response {
        match decode_entries(entries) {
            Ok(decoded) => {
                let count = decoded.len();
                let replaced = self.store.replace(key.clone(), decoded).is_some();
                info!(%request_id, key, count, replaced, "Embedding set stored");
                Response::SetEmbeddingsComplete { request_id }
            }
            Err(error) => {
                warn!(
                    %request_id,
                    key,
                    kept_previous = self.store.contains(&key),
                    error = %error,
                    "Embedding set rejected"
                );
                Response::SetEmbeddingsError { request_id, error }
            }
        }
    }

    fn get_scores(&mut self, request_id: RequestId, key: String, query: String) {
        let Some(entries) = self.store.get(&key) else {
            debug!(%request_id, key, "Query for unknown key");
            self.send(Response::GetScoresError {
                request_id,
                error: WorkerFailure::UnknownKey { key },
            });
            return;
        };

        debug!(%request_id, key, candidates = entries.len(), "Scoring query");

        let model = self.model.clone();
        let responses = self.responses.clone();
        self.tasks.spawn(async move {
            let response = match score_query(model, entries, query).await {
                Ok(scores) => Response::GetScoresComplete { request_id, scores },
                Err(error) => {
                    debug!(%request_id, error = %error, "Query failed");
                    Response::GetScoresError { request_id, error }
                }
            };
            // The client may already be gone; nothing left to deliver to.
            let _ = responses.send(response);
        });
    }

    fn send(&self, response: Response) {
        if self.responses.send(response).is_err() {
            debug!("Response dropped; client disconnected");
        }
    }
}

async fn score_query(
    model: ModelSlot,
    entries: Arc<[StoredEmbeddingEntry]>,
    query: String,
) -> Result<Vec<ScoreResult>, WorkerFailure> {
    let encoder = model.get().await?;

    match tokio::task::spawn_blocking(move || rank_query(encoder.as_ref(), &entries, &query))
        .await
    {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(WorkerFailure::Encoder {
            message: e.to_string(),
        }),
    }
}

/// Encodes `query` with the retrieval instruction, quantizes it and ranks `entries`.
pub fn rank_query(
    encoder: &dyn Encoder,
    entries: &[StoredEmbeddingEntry],
    query: &str,
) -> Result<Vec<ScoreResult>, WorkerFailure> {
    let raw = encoder.encode(&format!("{QUERY_INSTRUCTION}{query}"))?;
    let query_vector = quantize(&raw)?;

    let candidates = entries
        .iter()
        .map(|entry| {
            ScoreResult::new(
                entry.identifier.clone(),
                cosine_similarity_i8(query_vector.as_slice(), entry.vector.as_slice()),
            )
        })
        .collect();

    Ok(select_scores(candidates))
}
