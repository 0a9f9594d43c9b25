//! The execution stream reconciler: owns one run's lifecycle end-to-end.
//!
//! [`RunReconciler`] submits the current graph to the run endpoint, consumes
//! the response as an incremental NDJSON event stream, and folds every event
//! into the [`GraphStore`] in the exact order it was parsed. Between chunk
//! suspension points each chunk is processed to completion, so two chunks'
//! events can never interleave and a `result` can never be applied ahead of
//! the `start` that preceded it on the wire.
//!
//! # Run state machine
//!
//! ```text
//! Idle -> Sending -> Streaming -> Completed
//!                              \-> Failed     (transport error or cancel)
//! ```
//!
//! Per-node progress lives inside `Streaming` and never drives the run-level
//! state: a run completes only on an `end` event or true stream closure,
//! never because every currently-known node happens to be terminal.

use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;

use crate::graph::{GraphStore, NodeDataPatch};
use crate::run::decoder::LineDecoder;
use crate::run::event::{AggregateOutcome, StreamEvent};
use crate::run::request::RunRequest;
use crate::run::transport::{ByteStream, RunResponse, RunTransport, TransportError};
use crate::types::NodeStatus;
use futures_util::StreamExt;

/// Run-level lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunPhase {
    /// No run submitted yet, or the previous run's outcome was consumed.
    #[default]
    Idle,
    /// The request is being built and submitted.
    Sending,
    /// The response stream is being consumed.
    Streaming,
    /// The run finished via `end` or clean stream closure.
    Completed,
    /// The run failed at the transport level or was cancelled.
    Failed,
}

/// Terminal summary of one run, surfaced to the caller.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Final run-level phase (`Completed` on every `Ok` return).
    pub phase: RunPhase,
    /// Untargeted `error` events, recorded for surfacing to the user.
    pub run_errors: Vec<String>,
    /// Number of events that patched a node.
    pub events_applied: usize,
    /// Whether an explicit `end` event arrived (as opposed to closure).
    pub saw_end: bool,
}

/// Errors that terminate a run.
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    /// `start_run` was called while a run was already in flight.
    #[error("a run is already in progress")]
    #[diagnostic(
        code(flowloom::run::already_running),
        help("Only one run may be in flight per editor session; wait for it to finish.")
    )]
    AlreadyRunning,

    /// Transport failure before or during streaming.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),

    /// The caller aborted the run before `end` arrived.
    #[error("run cancelled before completion")]
    #[diagnostic(code(flowloom::run::cancelled))]
    Cancelled,
}

/// Caller-side handle that aborts an in-flight run.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    tx: flume::Sender<()>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent; a second call is a no-op.
    pub fn cancel(&self) {
        let _ = self.tx.try_send(());
    }
}

/// The reconciler-side end of a cancellation pair.
#[derive(Debug)]
pub struct CancelToken {
    rx: flume::Receiver<()>,
}

impl CancelToken {
    /// Create a linked handle/token pair.
    #[must_use]
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = flume::bounded(1);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// Resolves when cancellation is signalled. If every handle has been
    /// dropped without signalling, this never resolves.
    async fn cancelled(&self) {
        if self.rx.recv_async().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Owns the run lifecycle for one editor session.
///
/// Exactly one run may be in flight at a time; a second
/// [`start_run`](Self::start_run) is rejected rather than queued so two
/// writers can never patch the same node ids concurrently.
pub struct RunReconciler<T: RunTransport> {
    transport: T,
    in_progress: bool,
    phase: RunPhase,
}

impl<T: RunTransport> RunReconciler<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            in_progress: false,
            phase: RunPhase::Idle,
        }
    }

    /// The run-level lifecycle state.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// The transport this reconciler submits through.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether a run is currently in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.in_progress
    }

    /// Submit the current graph and reconcile the response to completion.
    ///
    /// Resets every node's status to `idle`, snapshots the store into a
    /// fresh [`RunRequest`], and applies each decoded event in arrival
    /// order. Returns the terminal [`RunReport`] on success.
    pub async fn start_run(&mut self, store: &mut GraphStore) -> Result<RunReport, RunError> {
        let (_handle, token) = CancelToken::pair();
        self.start_run_with_cancel(store, token).await
    }

    /// Like [`start_run`](Self::start_run), with a cancellation token.
    ///
    /// Cancellation between chunks stops reading, drops the body stream,
    /// clears the in-progress flag, and leaves node statuses exactly as
    /// last patched.
    pub async fn start_run_with_cancel(
        &mut self,
        store: &mut GraphStore,
        cancel: CancelToken,
    ) -> Result<RunReport, RunError> {
        if self.in_progress {
            return Err(RunError::AlreadyRunning);
        }
        self.in_progress = true;
        self.phase = RunPhase::Sending;

        let outcome = self.drive(store, cancel).await;

        // The flag clears on every exit path: normal end, transport
        // failure, and cancellation.
        self.in_progress = false;
        match outcome {
            Ok(mut report) => {
                self.phase = RunPhase::Completed;
                report.phase = RunPhase::Completed;
                tracing::info!(
                    events_applied = report.events_applied,
                    run_errors = report.run_errors.len(),
                    saw_end = report.saw_end,
                    "run completed"
                );
                Ok(report)
            }
            Err(err) => {
                self.phase = RunPhase::Failed;
                tracing::warn!(error = %err, "run failed");
                Err(err)
            }
        }
    }

    async fn drive(
        &mut self,
        store: &mut GraphStore,
        cancel: CancelToken,
    ) -> Result<RunReport, RunError> {
        store.reset_statuses();
        let request = RunRequest::from_store(store);
        tracing::debug!(
            nodes = request.nodes.len(),
            edges = request.edges.len(),
            "submitting run request"
        );

        match self.transport.send(&request).await? {
            RunResponse::Aggregate(value) => self.apply_aggregate(store, value),
            RunResponse::Stream(stream) => {
                self.phase = RunPhase::Streaming;
                self.consume_stream(store, stream, cancel).await
            }
        }
    }

    /// Consume the chunked body: decode, split, dispatch, in order.
    ///
    /// The stream is owned by this scope, so it is released on every exit
    /// path, including cancellation and mid-stream transport failure.
    async fn consume_stream(
        &mut self,
        store: &mut GraphStore,
        mut stream: ByteStream,
        cancel: CancelToken,
    ) -> Result<RunReport, RunError> {
        let mut decoder = LineDecoder::new();
        let mut report = RunReport::default();

        'read: loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RunError::Cancelled),
                next = stream.next() => next,
            };
            match next {
                // True stream closure: the run is complete even without `end`.
                None => break 'read,
                Some(Err(err)) => return Err(err.into()),
                Some(Ok(chunk)) => {
                    for record in decoder.feed(&chunk) {
                        self.apply_record(store, &record, &mut report);
                        if report.saw_end {
                            break 'read;
                        }
                    }
                }
            }
        }

        // Recover a final record emitted without a trailing delimiter.
        if !report.saw_end {
            if let Some(tail) = decoder.finish() {
                match StreamEvent::parse_line(&tail) {
                    Some(Ok(StreamEvent::Unknown)) | Some(Err(_)) | None => {}
                    Some(Ok(event)) => self.dispatch(store, event, &mut report),
                }
            }
        }

        Ok(report)
    }

    fn apply_record(&self, store: &mut GraphStore, record: &str, report: &mut RunReport) {
        match StreamEvent::parse_line(record) {
            None => {}
            Some(Err(err)) => {
                tracing::warn!(error = %err, record, "discarding malformed stream record");
            }
            Some(Ok(event)) => self.dispatch(store, event, report),
        }
    }

    fn dispatch(&self, store: &mut GraphStore, event: StreamEvent, report: &mut RunReport) {
        match event {
            StreamEvent::Start { node_id } => {
                store.patch_node_data(
                    &node_id,
                    NodeDataPatch::new().with_status(NodeStatus::Running),
                );
                report.events_applied += 1;
            }
            StreamEvent::Result { node_id, result } => {
                store.patch_node_data(
                    &node_id,
                    NodeDataPatch::new()
                        .with_status(NodeStatus::Success)
                        .with_result(result),
                );
                report.events_applied += 1;
            }
            StreamEvent::Error {
                node_id: Some(node_id),
                error,
            } => {
                store.patch_node_data(
                    &node_id,
                    NodeDataPatch::new()
                        .with_status(NodeStatus::Error)
                        .with_result(json!(error)),
                );
                report.events_applied += 1;
            }
            StreamEvent::Error {
                node_id: None,
                error,
            } => {
                tracing::warn!(error = %error, "run-level error event");
                report.run_errors.push(error);
            }
            StreamEvent::End => {
                report.saw_end = true;
            }
            StreamEvent::Unknown => {
                tracing::warn!("discarding stream record with unknown tag");
            }
        }
    }

    /// Fold the legacy aggregate response into per-node patches.
    fn apply_aggregate(
        &mut self,
        store: &mut GraphStore,
        value: serde_json::Value,
    ) -> Result<RunReport, RunError> {
        let outcome: AggregateOutcome =
            serde_json::from_value(value).map_err(TransportError::from)?;
        let mut report = RunReport {
            saw_end: true,
            ..Default::default()
        };
        for run in &outcome.node_runs {
            let mut patch = NodeDataPatch::new().with_status(run.status);
            if let Some(result) = outcome.result_for(&run.node_id) {
                patch = patch.with_result(result);
            } else if let Some(preview) = &run.output_preview {
                patch = patch.with_result(json!(preview));
            }
            store.patch_node_data(&run.node_id, patch);
            report.events_applied += 1;
        }
        Ok(report)
    }
}
