//! The worker boundary: an actor that owns the encoder and embedding sets, and the
//! client that talks to it by message passing.
//!
//! ```text
//! WorkerClient ──Request──▶ mpsc ──▶ Worker ──▶ JoinSet / spawn_blocking
//!      ▲                                              │
//!      └── dispatcher ◀── Response ◀── mpsc ◀─────────┘
//! ```

pub mod actor;
pub mod client;
mod model;
pub mod protocol;
pub mod store;


pub use actor::{DEFAULT_QUEUE_CAPACITY, Worker, WorkerHandle, WorkerOptions, rank_query};
pub use client::{WorkerClient, WorkerEvent};
pub use protocol::{RawEmbeddingEntry, Request, RequestId, Response, WorkerFailure};
pub use store::{EmbeddingStore, StoredEmbeddingEntry, decode_entries};
