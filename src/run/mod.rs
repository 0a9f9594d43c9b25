//! The run pipeline: request building, stream decoding, reconciliation,
//! and status projection.
//!
//! # Architecture
//!
//! - **[`RunRequest`]** — fresh snapshot of the live graph at submit time
//! - **[`RunTransport`]** — the seam to the run endpoint
//!   ([`HttpRunTransport`] in production, in-memory streams in tests)
//! - **[`LineDecoder`]** — chunk-boundary-safe NDJSON line splitting
//! - **[`StreamEvent`]** — the closed sum of wire event records
//! - **[`RunReconciler`]** — drives the run lifecycle and patches the store
//! - **[`project`]** — pure status-to-render-props mapping
//!
//! # Usage
//!
//! ```rust,no_run
//! use flowloom::config::RunConfig;
//! use flowloom::graph::GraphStore;
//! use flowloom::run::{HttpRunTransport, RunReconciler};
//!
//! # async fn example(mut store: GraphStore) -> Result<(), flowloom::run::RunError> {
//! let config = RunConfig::default();
//! let mut reconciler = RunReconciler::new(HttpRunTransport::new(&config));
//! let report = reconciler.start_run(&mut store).await?;
//! println!("applied {} events", report.events_applied);
//! # Ok(())
//! # }
//! ```

mod decoder;
mod event;
mod projector;
mod reconciler;
mod request;
mod transport;

pub use decoder::LineDecoder;
pub use event::{AggregateOutcome, NodeRun, StreamEvent};
pub use projector::{PREVIEW_MAX_CHARS, RenderProps, StatusColor, project};
pub use reconciler::{CancelHandle, CancelToken, RunError, RunPhase, RunReconciler, RunReport};
pub use request::RunRequest;
pub use transport::{ByteStream, HttpRunTransport, RunResponse, RunTransport, TransportError};
