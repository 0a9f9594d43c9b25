//! Shared fixtures for the run pipeline integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream;

use flowloom::graph::{GraphStore, Node};
use flowloom::run::{ByteStream, RunRequest, RunResponse, RunTransport, TransportError};
use flowloom::types::{NodeKind, Position};

/// What the scripted transport should answer with.
pub enum Script {
    /// A streaming body delivered as these exact byte chunks.
    Chunks(Vec<Vec<u8>>),
    /// The legacy aggregate JSON body.
    Aggregate(serde_json::Value),
    /// A pre-built stream, for custom chunk timing.
    Stream(ByteStream),
    /// Fail the send outright.
    Fail,
    /// Never resolve the send.
    Hang,
}

/// In-memory [`RunTransport`] driven by a [`Script`], counting sends.
pub struct ScriptedTransport {
    script: Mutex<Option<Script>>,
    sends: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(script: Script) -> Self {
        Self {
            script: Mutex::new(Some(script)),
            sends: AtomicUsize::new(0),
        }
    }

    /// One streaming body split at the given chunk boundaries.
    pub fn chunked(chunks: Vec<Vec<u8>>) -> Self {
        Self::new(Script::Chunks(chunks))
    }

    /// One streaming body delivered whole.
    pub fn whole(body: &str) -> Self {
        Self::chunked(vec![body.as_bytes().to_vec()])
    }

    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RunTransport for ScriptedTransport {
    async fn send(&self, _request: &RunRequest) -> Result<RunResponse, TransportError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        let script = self
            .script
            .lock()
            .unwrap()
            .take()
            .expect("scripted transport used once per test");
        match script {
            Script::Chunks(chunks) => {
                let stream = stream::iter(
                    chunks
                        .into_iter()
                        .map(|c| Ok::<Bytes, TransportError>(Bytes::from(c))),
                )
                .boxed();
                Ok(RunResponse::Stream(stream))
            }
            Script::Aggregate(value) => Ok(RunResponse::Aggregate(value)),
            Script::Stream(stream) => Ok(RunResponse::Stream(stream)),
            Script::Fail => Err(TransportError::Status {
                status: 500,
                body: "runner unavailable".to_string(),
            }),
            Script::Hang => {
                futures_util::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

/// A store with idle nodes `a` and `b` and no edges.
pub fn store_ab() -> GraphStore {
    let mut store = GraphStore::new();
    store
        .add_node(Node::new("a", NodeKind::Llm, Position::new(50.0, 50.0)))
        .unwrap();
    store
        .add_node(Node::new("b", NodeKind::Rag, Position::new(250.0, 50.0)))
        .unwrap();
    store
}
