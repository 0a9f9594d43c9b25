//! The canonical, mutable editor graph: nodes, edges, and their data payloads.
//!
//! [`GraphStore`] is the single authority for graph contents during an editor
//! session. Gesture handlers and the run reconciler both mutate it; every
//! consumer that needs a point-in-time view must call [`GraphStore::nodes`] /
//! [`GraphStore::edges`] at the moment of use rather than hold onto a copy
//! captured earlier, because the canvas collaborator re-renders on its own
//! schedule and last-rendered props can be stale.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::{NodeKind, NodeStatus, Position};

/// The data record carried by every node.
///
/// `label` and `goal` are authored by the user; `status` and `result` are
/// runtime fields owned by the reconciler. Kind-specific configuration
/// (prompts, queries, ...) lives in the flattened `extra` map so the store
/// does not need to know every node kind's schema.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub status: NodeStatus,
    /// Present only after a `result` or `error` event reached this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Kind-specific configuration fields (e.g. `prompt`, `query`).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl NodeData {
    /// Create a node's default data record: label and goal only.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Shallow-merge a patch into this record. Unset patch fields are
    /// left untouched; `extra` entries overwrite key-by-key.
    pub fn apply(&mut self, patch: NodeDataPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(goal) = patch.goal {
            self.goal = goal;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(result) = patch.result {
            self.result = Some(result);
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
    }
}

/// A shallow partial update for a node's [`NodeData`].
///
/// All fields are optional; a patch only touches what it carries. Built with
/// the fluent `with_*` API:
///
/// ```rust
/// use flowloom::graph::NodeDataPatch;
/// use flowloom::types::NodeStatus;
/// use serde_json::json;
///
/// let patch = NodeDataPatch::new()
///     .with_status(NodeStatus::Success)
///     .with_result(json!("42"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub goal: Option<String>,
    pub status: Option<NodeStatus>,
    pub result: Option<Value>,
    pub extra: serde_json::Map<String, Value>,
}

impl NodeDataPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A node in the editor graph.
///
/// The `kind` field serializes under the wire name `type`, matching the run
/// endpoint's request schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: NodeData,
}

impl Node {
    /// Create a node with default data (`label` = id, empty `goal`).
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<NodeKind>, position: Position) -> Self {
        let id = id.into();
        let data = NodeData::new(id.clone());
        Self {
            id,
            kind: kind.into(),
            position,
            data,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }
}

/// A directed edge between two nodes, identified by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Errors from structural graph mutations.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// A node with this id already exists in the store.
    #[error("duplicate node id: {id}")]
    #[diagnostic(
        code(flowloom::graph::duplicate_node),
        help("Node ids must be unique within a graph; generate a fresh id.")
    )]
    DuplicateNode { id: String },

    /// An edge with this id already exists in the store.
    #[error("duplicate edge id: {id}")]
    #[diagnostic(code(flowloom::graph::duplicate_edge))]
    DuplicateEdge { id: String },

    /// An edge endpoint does not reference a stored node.
    #[error("edge {edge_id} references unknown node: {node_id}")]
    #[diagnostic(
        code(flowloom::graph::unknown_endpoint),
        help("Both endpoints must exist in the store when the edge is added.")
    )]
    UnknownEndpoint { edge_id: String, node_id: String },

    /// The drag payload could not be parsed.
    #[error("invalid drop payload: {source}")]
    #[diagnostic(
        code(flowloom::graph::invalid_drop_payload),
        help("Drop payloads are JSON objects carrying at least a `type` field.")
    )]
    InvalidDropPayload {
        #[from]
        source: serde_json::Error,
    },
}

/// Owns the live set of nodes and edges for one editor session.
///
/// Nodes are kept in insertion order (the order the canvas draws and the
/// run request serializes them in) with an id index for O(1) patch lookups.
///
/// # Examples
///
/// ```rust
/// use flowloom::graph::{Edge, GraphStore, Node, NodeDataPatch};
/// use flowloom::types::{NodeKind, NodeStatus, Position};
///
/// let mut store = GraphStore::new();
/// store.add_node(Node::new("a", NodeKind::Llm, Position::new(50.0, 50.0)))?;
/// store.add_node(Node::new("b", NodeKind::Rag, Position::new(250.0, 50.0)))?;
/// store.add_edge(Edge::new("e1", "a", "b"))?;
///
/// store.patch_node_data("a", NodeDataPatch::new().with_status(NodeStatus::Running));
/// assert_eq!(store.node("a").unwrap().data.status, NodeStatus::Running);
/// # Ok::<(), flowloom::graph::GraphError>(())
/// ```
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    index: FxHashMap<String, usize>,
    edges: Vec<Edge>,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the store. Fails on a duplicate id.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode { id: node.id });
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Move a node. Unknown ids are a no-op: position updates arrive from
    /// drag gestures that may race node removal.
    pub fn update_node_position(&mut self, id: &str, position: Position) {
        if let Some(&slot) = self.index.get(id) {
            self.nodes[slot].position = position;
        }
    }

    /// Shallow-merge a patch into a node's data record.
    ///
    /// Unknown ids are a no-op, not an error: stream events can target a
    /// node that was removed after the run request was built.
    pub fn patch_node_data(&mut self, id: &str, patch: NodeDataPatch) {
        match self.index.get(id) {
            Some(&slot) => self.nodes[slot].data.apply(patch),
            None => {
                tracing::debug!(node_id = %id, "dropping patch for unknown node");
            }
        }
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    /// The authoritative live node collection, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The authoritative live edge collection, in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Add an edge. Both endpoints must exist in the store at insert time.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edges.iter().any(|e| e.id == edge.id) {
            return Err(GraphError::DuplicateEdge { id: edge.id });
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.index.contains_key(endpoint) {
                return Err(GraphError::UnknownEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Remove a node by id. Returns whether a node was removed.
    ///
    /// Edges referencing the node are left in place; the backend contract
    /// does not cascade, so dangling edges persist until the user deletes
    /// them.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        self.nodes.remove(slot);
        for moved in &self.nodes[slot..] {
            if let Some(entry) = self.index.get_mut(&moved.id) {
                *entry -= 1;
            }
        }
        true
    }

    /// Reset every node's runtime fields ahead of a new run.
    pub fn reset_statuses(&mut self) {
        for node in &mut self.nodes {
            node.data.status = NodeStatus::Idle;
            node.data.result = None;
        }
    }
}
