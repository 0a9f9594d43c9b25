//! The editor graph model: nodes, edges, and the live [`GraphStore`].
//!
//! This module owns the canonical in-memory graph for one editor session.
//! The store is deliberately small: an id-indexed node list, an edge list,
//! and shallow-merge patch semantics for node data. There is no undo
//! history and no persistence here; named-workflow CRUD lives behind the
//! HTTP collaborator.
//!
//! # Core Concepts
//!
//! - **[`Node`]**: id + [`NodeKind`](crate::types::NodeKind) + position +
//!   [`NodeData`] payload
//! - **[`Edge`]**: directed connection between two stored node ids
//! - **[`NodeDataPatch`]**: shallow partial update applied by gesture
//!   handlers and the run reconciler
//! - **Freshness**: [`GraphStore::nodes`]/[`GraphStore::edges`] expose the
//!   live collections; snapshot consumers read them at the moment of use
//!
//! # Quick Start
//!
//! ```rust
//! use flowloom::graph::{Edge, GraphStore, Node};
//! use flowloom::types::{NodeKind, Position};
//!
//! let mut store = GraphStore::new();
//! store.add_node(Node::new("llm-1", NodeKind::Llm, Position::new(50.0, 50.0)))?;
//! store.add_node(Node::new("rag-1", NodeKind::Rag, Position::new(250.0, 50.0)))?;
//! store.add_edge(Edge::new("e1", "llm-1", "rag-1"))?;
//!
//! assert_eq!(store.nodes().len(), 2);
//! assert_eq!(store.edges().len(), 1);
//! # Ok::<(), flowloom::graph::GraphError>(())
//! ```

mod store;

#[cfg(test)]
mod tests;

pub use store::{Edge, GraphError, GraphStore, Node, NodeData, NodeDataPatch};
