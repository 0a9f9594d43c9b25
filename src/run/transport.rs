//! The transport seam between the reconciler and the run endpoint.
//!
//! [`RunTransport`] is the only trait boundary in the run pipeline: the
//! reconciler is written against it, production uses [`HttpRunTransport`],
//! and tests substitute in-memory chunk streams to exercise every parsing
//! path without a network.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use miette::Diagnostic;
use thiserror::Error;

use crate::config::RunConfig;
use crate::run::request::RunRequest;

/// Ordered byte chunks of a streaming response body.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// What the run endpoint answered with.
///
/// Streaming NDJSON is the primary form; older deployments answer with one
/// aggregate JSON object, which callers fold through
/// [`AggregateOutcome`](crate::run::AggregateOutcome).
pub enum RunResponse {
    /// A chunked newline-delimited JSON body.
    Stream(ByteStream),
    /// The legacy single-object response, already fully read.
    Aggregate(serde_json::Value),
}

/// Errors raised at the transport boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum TransportError {
    /// Connection or protocol failure before or during streaming.
    #[error("http transport error: {source}")]
    #[diagnostic(code(flowloom::transport::http))]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("run endpoint returned HTTP {status}: {body}")]
    #[diagnostic(
        code(flowloom::transport::status),
        help("Check that the run endpoint is reachable and the graph serializes cleanly.")
    )]
    Status { status: u16, body: String },

    /// The aggregate body was not valid JSON.
    #[error("run endpoint returned an unreadable body: {source}")]
    #[diagnostic(code(flowloom::transport::body))]
    Body {
        #[from]
        source: serde_json::Error,
    },
}

/// Submits a run request and yields the response body.
#[async_trait]
pub trait RunTransport: Send + Sync {
    async fn send(&self, request: &RunRequest) -> Result<RunResponse, TransportError>;
}

/// Production transport: POSTs the request as JSON to a fixed run endpoint.
///
/// The response form is picked by Content-Type: `application/json` means the
/// legacy aggregate object; everything else (NDJSON deployments advertise
/// `application/x-ndjson`) is consumed as a chunk stream.
pub struct HttpRunTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRunTransport {
    /// Build a transport against the configured run endpoint.
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        Self::with_endpoint(config.endpoint.clone())
    }

    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint this transport submits runs to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RunTransport for HttpRunTransport {
    async fn send(&self, request: &RunRequest) -> Result<RunResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let body = response.text().await?;
            let value: serde_json::Value = serde_json::from_str(&body)?;
            tracing::debug!(endpoint = %self.endpoint, "run endpoint answered with aggregate body");
            Ok(RunResponse::Aggregate(value))
        } else {
            tracing::debug!(
                endpoint = %self.endpoint,
                content_type = %content_type,
                "run endpoint answered with a chunked stream"
            );
            let stream = response
                .bytes_stream()
                .map_err(TransportError::from)
                .boxed();
            Ok(RunResponse::Stream(stream))
        }
    }
}
