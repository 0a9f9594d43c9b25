//! Core types for the flowloom workflow editor engine.
//!
//! This module defines the fundamental identifiers shared by the graph store
//! and the run machinery: node kinds, per-node runtime status, and graph-space
//! positions. These are the core domain concepts that define what an editor
//! graph *is*; everything run-specific lives in [`crate::run`].
//!
//! # Key Types
//!
//! - [`NodeKind`]: Identifies the kind of an agent node (LLM, RAG, ...)
//! - [`NodeStatus`]: Per-node runtime status advanced by stream events
//! - [`Position`]: A point in graph space
//!
//! # Examples
//!
//! ```rust
//! use flowloom::types::{NodeKind, NodeStatus};
//!
//! let kind = NodeKind::Llm;
//! assert_eq!(kind.encode(), "llm_node");
//! assert_eq!(NodeKind::decode("rag_node"), NodeKind::Rag);
//!
//! // Unknown kinds pass through so the palette stays extensible.
//! assert_eq!(NodeKind::decode("webhook"), NodeKind::Custom("webhook".into()));
//!
//! assert_eq!(NodeStatus::default(), NodeStatus::Idle);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the kind of an agent node within an editor graph.
///
/// The known kinds mirror what the remote runner can execute; arbitrary
/// kinds are carried through the [`Custom`](Self::Custom) variant so new
/// palette entries do not require a crate release.
///
/// # Wire format
///
/// `NodeKind` serializes to the snake_case string the backend expects
/// (`"llm_node"`, `"rag_node"`, `"action_node"`); custom kinds pass their
/// string through unchanged. Deserialization is total: any string decodes
/// to a `NodeKind`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// A large-language-model completion node driven by a prompt/goal.
    Llm,
    /// A retrieval node that queries the document index.
    Rag,
    /// A side-effecting action node.
    Action,
    /// Any other node kind, identified by its wire string.
    Custom(String),
}

impl NodeKind {
    /// Encode a `NodeKind` into its wire string form.
    ///
    /// ```rust
    /// # use flowloom::types::NodeKind;
    /// assert_eq!(NodeKind::Llm.encode(), "llm_node");
    /// assert_eq!(NodeKind::Custom("webhook".into()).encode(), "webhook");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            NodeKind::Llm => "llm_node".to_string(),
            NodeKind::Rag => "rag_node".to_string(),
            NodeKind::Action => "action_node".to_string(),
            NodeKind::Custom(s) => s.clone(),
        }
    }

    /// Decode a wire string back into a `NodeKind`.
    ///
    /// Unrecognized strings become [`Custom`](Self::Custom), keeping the
    /// decoding total and forward-compatible.
    pub fn decode(s: &str) -> Self {
        match s {
            "llm_node" => NodeKind::Llm,
            "rag_node" => NodeKind::Rag,
            "action_node" => NodeKind::Action,
            other => NodeKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

// Developer Experience: allow using string literals where a NodeKind is expected.
impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        NodeKind::decode(s)
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        NodeKind::decode(&s)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.encode()
    }
}

/// Per-node runtime status, driven by the execution stream.
///
/// Every node starts at [`Idle`](Self::Idle). During a run the reconciler
/// advances a node through [`Running`](Self::Running) into one of the
/// terminal states; statuses are never regressed except when a new run
/// starts and resets the whole graph back to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Not part of any active run, or reset at run start.
    #[default]
    Idle,
    /// The runner reported a `start` event for this node.
    Running,
    /// The runner reported a `result` event for this node.
    Success,
    /// The runner reported an `error` event targeting this node.
    Error,
}

impl NodeStatus {
    /// Returns `true` for the two terminal states.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeStatus::Success | NodeStatus::Error)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A point in graph space.
///
/// Node positions are stored in graph coordinates; pointer coordinates are
/// translated through [`crate::canvas::screen_to_graph`] before they land
/// here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
