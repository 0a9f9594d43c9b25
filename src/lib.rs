//! # Flowloom: Workflow Graph Engine for Visual Agent Editors
//!
//! Flowloom is the state engine behind a visual agent-workflow editor: it
//! owns the in-memory graph of agent nodes, snapshots it into run requests,
//! and reconciles the remote runner's streaming progress back into per-node
//! statuses that a canvas can draw.
//!
//! The crate deliberately stops at the canvas boundary. Rendering, gesture
//! capture, view routing, and the node palette are external collaborators;
//! they talk to flowloom through the [`graph::GraphStore`] accessors, the
//! [`canvas`] coordinate mapper, and the [`run::project`] status projector.
//!
//! ## Core Concepts
//!
//! - **Graph Store**: the single live graph per editor session —
//!   id-indexed nodes, edges, shallow-merge data patches
//! - **Coordinate Mapper**: pure screen-to-graph translation for drop
//!   gestures under pan/zoom
//! - **Run Request**: an immutable snapshot of the store, taken fresh at
//!   submit time
//! - **Stream Reconciler**: consumes the chunked NDJSON response and folds
//!   each event into the store, in arrival order
//! - **Status Projector**: pure mapping from node data to render props
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowloom::canvas::{apply_drop, ScreenPoint, Viewport};
//! use flowloom::config::RunConfig;
//! use flowloom::graph::GraphStore;
//! use flowloom::run::{HttpRunTransport, RunReconciler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = GraphStore::new();
//!
//! // A palette drop lands a new idle node at the mapped position.
//! apply_drop(
//!     &mut store,
//!     r#"{"type": "llm_node"}"#,
//!     ScreenPoint::new(120.0, 80.0),
//!     &Viewport::default(),
//! )?;
//!
//! // Submitting snapshots the live store and streams progress back in.
//! let mut reconciler = RunReconciler::new(HttpRunTransport::new(&RunConfig::default()));
//! let report = reconciler.start_run(&mut store).await?;
//! assert!(report.run_errors.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Node kinds, runtime statuses, graph-space positions
//! - [`graph`] - The live graph store and patch semantics
//! - [`canvas`] - Coordinate mapping and the drop protocol
//! - [`run`] - Request building, stream decoding, reconciliation, projection
//! - [`config`] - Endpoint and preview configuration
//! - [`telemetry`] - Opt-in tracing initialization

pub mod canvas;
pub mod config;
pub mod graph;
pub mod run;
pub mod telemetry;
pub mod types;
