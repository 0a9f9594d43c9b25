//! Run request construction: a fresh snapshot of the live graph.

use serde::Serialize;

use crate::graph::{Edge, GraphStore, Node};

/// The immutable body POSTed to the run endpoint.
///
/// A `RunRequest` can only be built from the live [`GraphStore`], never from
/// a caller-supplied snapshot: the canvas collaborator re-renders on its own
/// schedule and props captured during an earlier render can describe a graph
/// the user has since changed. Reading the store's accessors at submit time
/// is what keeps the request fresh.
#[derive(Clone, Debug, Serialize)]
pub struct RunRequest {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl RunRequest {
    /// Snapshot the store's current contents synchronously at call time.
    #[must_use]
    pub fn from_store(store: &GraphStore) -> Self {
        Self {
            nodes: store.nodes().to_vec(),
            edges: store.edges().to_vec(),
        }
    }
}
