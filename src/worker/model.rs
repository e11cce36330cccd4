use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{OnceCell, mpsc};
use tracing::{debug, info, warn};

use crate::embedding::{EmbeddingError, Encoder, EncoderLoader};

use super::protocol::Response;

/// Lazily loaded query encoder shared by all of a worker's in-flight queries.
///
/// The first caller runs the loader on the blocking pool; concurrent callers await the
/// same initialization. A failed load leaves the slot empty so the next caller retries.
#[derive(Clone)]
pub(crate) struct ModelSlot {
    loader: Arc<dyn EncoderLoader>,
    cell: Arc<OnceCell<Arc<dyn Encoder>>>,
    notify: mpsc::UnboundedSender<Response>,
}

impl ModelSlot {
    pub(crate) fn new(
        loader: Arc<dyn EncoderLoader>,
        notify: mpsc::UnboundedSender<Response>,
    ) -> Self {
        Self {
            loader,
            cell: Arc::new(OnceCell::new()),
            notify,
        }
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub(crate) async fn get(&self) -> Result<Arc<dyn Encoder>, EmbeddingError> {
        let encoder = self
            .cell
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let started = Instant::now();
                debug!("Loading query encoder");

                let encoder = match tokio::task::spawn_blocking(move || loader.load()).await {
                    Ok(result) => result?,
                    Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                    Err(e) => {
                        return Err(EmbeddingError::ModelLoadFailed {
                            reason: e.to_string(),
                        });
                    }
                };

                info!(
                    output_dim = encoder.output_dim(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query encoder ready"
                );
                if self.notify.send(Response::ModelLoaded).is_err() {
                    warn!("Model loaded after the client went away");
                }
                Ok::<_, EmbeddingError>(encoder)
            })
            .await?;

        Ok(Arc::clone(encoder))
    }
}
