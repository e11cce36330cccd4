use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::embedding::EncoderLoader;
use crate::scoring::ScoreResult;
use crate::search::SearchError;

use super::actor::{Worker, WorkerOptions};
use super::protocol::{RawEmbeddingEntry, Request, RequestId, Response};

type Waiter = oneshot::Sender<Result<Response, SearchError>>;

const EVENT_CAPACITY: usize = 16;

/// Notifications the client raises outside any request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerEvent {
    /// The query encoder finished loading.
    ModelLoaded,
    /// The worker ended; every pending request was rejected.
    Crashed,
}

#[derive(Default)]
struct PendingTable {
    waiters: HashMap<RequestId, Waiter>,
    /// Set once the worker is gone. Checked under the same lock as inserts, so no
    /// request can be registered after the table was drained.
    contaminated: bool,
}

struct Shared {
    pending: Mutex<PendingTable>,
    events: broadcast::Sender<WorkerEvent>,
    model_loaded: AtomicBool,
}

/// Caller-side handle to a [`Worker`]. Cheap to clone.
///
/// Each call registers a oneshot waiter under a fresh [`RequestId`], sends the request
/// and awaits the dispatcher routing the matching response back. There is no timeout.
#[derive(Clone)]
pub struct WorkerClient {
    requests: mpsc::Sender<Request>,
    shared: Arc<Shared>,
}

impl fmt::Debug for WorkerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerClient")
            .field("pending", &self.pending_count())
            .field("model_loaded", &self.is_model_loaded())
            .field("contaminated", &self.is_contaminated())
            .finish()
    }
}

impl WorkerClient {
    /// Spawns a worker and connects to it. Must be called inside a tokio runtime.
    pub fn spawn(loader: Arc<dyn EncoderLoader>, options: &WorkerOptions) -> Self {
        let handle = Worker::spawn(loader, options);
        Self::connect(handle.requests, handle.responses)
    }

    /// Connects to any task speaking the worker protocol over these channels.
    pub fn connect(
        requests: mpsc::Sender<Request>,
        responses: mpsc::UnboundedReceiver<Response>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(Shared {
            pending: Mutex::new(PendingTable::default()),
            events,
            model_loaded: AtomicBool::new(false),
        });

        tokio::spawn(dispatch(Arc::clone(&shared), responses));

        Self { requests, shared }
    }

    /// Stores `entries` under `key`, replacing any previous set.
    pub async fn set_embeddings(
        &self,
        key: &str,
        entries: Vec<RawEmbeddingEntry>,
    ) -> Result<(), SearchError> {
        let response = self
            .call(|request_id| Request::SetEmbeddings {
                request_id,
                key: key.to_string(),
                entries,
            })
            .await?;

        match response {
            Response::SetEmbeddingsComplete { .. } => Ok(()),
            Response::SetEmbeddingsError { error, .. } => Err(error.into()),
            other => Err(SearchError::UnexpectedResponse {
                kind: other.kind(),
            }),
        }
    }

    /// Ranks the set stored under `key` against `query`.
    pub async fn get_scores(&self, key: &str, query: &str) -> Result<Vec<ScoreResult>, SearchError> {
        let response = self
            .call(|request_id| Request::GetScores {
                request_id,
                key: key.to_string(),
                query: query.to_string(),
            })
            .await?;

        match response {
            Response::GetScoresComplete { scores, .. } => Ok(scores),
            Response::GetScoresError { error, .. } => Err(error.into()),
            other => Err(SearchError::UnexpectedResponse {
                kind: other.kind(),
            }),
        }
    }

    /// `true` once the worker reported `modelLoaded`.
    pub fn is_model_loaded(&self) -> bool {
        self.shared.model_loaded.load(Ordering::Acquire)
    }

    /// `true` once the worker has gone away. Every later call fails with
    /// [`SearchError::Transport`].
    pub fn is_contaminated(&self) -> bool {
        self.shared.pending.lock().contaminated
    }

    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().waiters.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkerEvent> {
        self.shared.events.subscribe()
    }

    async fn call(
        &self,
        build: impl FnOnce(RequestId) -> Request,
    ) -> Result<Response, SearchError> {
        let request_id = RequestId::new();
        let (tx, rx) = oneshot::channel();

        {
            let mut pending = self.shared.pending.lock();
            if pending.contaminated {
                return Err(SearchError::worker_gone());
            }
            pending.waiters.insert(request_id, tx);
        }
        // Registered before sending, so a fast response always finds its waiter.
        let _registration = Registration {
            shared: &self.shared,
            request_id,
        };

        if self.requests.send(build(request_id)).await.is_err() {
            return Err(SearchError::worker_gone());
        }

        rx.await.unwrap_or_else(|_| Err(SearchError::worker_gone()))
    }
}

/// Removes a waiter from the pending table when its call ends, including when the
/// caller drops the call future while it waits on a full mailbox or a response.
struct Registration<'a> {
    shared: &'a Shared,
    request_id: RequestId,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.shared.pending.lock().waiters.remove(&self.request_id);
    }
}

async fn dispatch(shared: Arc<Shared>, mut responses: mpsc::UnboundedReceiver<Response>) {
    while let Some(response) = responses.recv().await {
        let Some(request_id) = response.request_id() else {
            shared.model_loaded.store(true, Ordering::Release);
            let _ = shared.events.send(WorkerEvent::ModelLoaded);
            continue;
        };

        let waiter = shared.pending.lock().waiters.remove(&request_id);
        match waiter {
            Some(tx) => {
                debug!(%request_id, kind = response.kind(), "Routing worker response");
                // The caller may have stopped waiting.
                let _ = tx.send(Ok(response));
            }
            None => warn!(%request_id, kind = response.kind(), "Response for unknown request"),
        }
    }

    let orphaned: Vec<Waiter> = {
        let mut pending = shared.pending.lock();
        pending.contaminated = true;
        pending.waiters.drain().map(|(_, tx)| tx).collect()
    };

    if orphaned.is_empty() {
        warn!("Search worker channel closed");
    } else {
        error!(
            pending = orphaned.len(),
            "Search worker terminated; rejecting pending requests"
        );
    }

    for tx in orphaned {
        let _ = tx.send(Err(SearchError::worker_gone()));
    }
    let _ = shared.events.send(WorkerEvent::Crashed);
}
