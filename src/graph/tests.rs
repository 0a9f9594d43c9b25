//! Test suite for the graph store.
//!
//! Covers structural mutations, patch semantics for runtime fields, and the
//! no-op behavior for unknown ids that late stream events rely on.

use super::{Edge, GraphError, GraphStore, Node, NodeDataPatch};
use crate::types::{NodeKind, NodeStatus, Position};
use serde_json::json;

fn two_node_store() -> GraphStore {
    let mut store = GraphStore::new();
    store
        .add_node(Node::new("a", NodeKind::Llm, Position::new(50.0, 50.0)))
        .unwrap();
    store
        .add_node(Node::new("b", NodeKind::Rag, Position::new(250.0, 50.0)))
        .unwrap();
    store
}

#[test]
fn add_node_rejects_duplicate_id() {
    let mut store = two_node_store();
    let err = store
        .add_node(Node::new("a", NodeKind::Action, Position::default()))
        .unwrap_err();
    assert!(matches!(err, GraphError::DuplicateNode { id } if id == "a"));
}

#[test]
fn new_node_starts_idle_with_label_from_id() {
    let store = two_node_store();
    let node = store.node("a").unwrap();
    assert_eq!(node.data.status, NodeStatus::Idle);
    assert_eq!(node.data.label, "a");
    assert_eq!(node.data.goal, "");
    assert!(node.data.result.is_none());
}

#[test]
fn add_edge_requires_both_endpoints() {
    let mut store = two_node_store();
    store.add_edge(Edge::new("e1", "a", "b")).unwrap();

    let err = store.add_edge(Edge::new("e2", "a", "ghost")).unwrap_err();
    assert!(matches!(
        err,
        GraphError::UnknownEndpoint { node_id, .. } if node_id == "ghost"
    ));

    let err = store.add_edge(Edge::new("e1", "b", "a")).unwrap_err();
    assert!(matches!(err, GraphError::DuplicateEdge { .. }));
}

#[test]
fn patch_merges_shallowly_and_ignores_unknown_ids() {
    let mut store = two_node_store();
    store.patch_node_data(
        "a",
        NodeDataPatch::new()
            .with_status(NodeStatus::Success)
            .with_result(json!({"answer": 42})),
    );
    let node = store.node("a").unwrap();
    assert_eq!(node.data.status, NodeStatus::Success);
    assert_eq!(node.data.result, Some(json!({"answer": 42})));
    // Untouched fields survive the merge.
    assert_eq!(node.data.label, "a");

    // Unknown id: silently dropped, store unchanged.
    store.patch_node_data("ghost", NodeDataPatch::new().with_status(NodeStatus::Error));
    assert_eq!(store.nodes().len(), 2);
}

#[test]
fn patch_extra_entries_overwrite_key_by_key() {
    let mut store = two_node_store();
    store.patch_node_data("b", NodeDataPatch::new().with_extra("query", json!("old")));
    store.patch_node_data(
        "b",
        NodeDataPatch::new()
            .with_extra("query", json!("new"))
            .with_extra("top_k", json!(5)),
    );
    let extra = &store.node("b").unwrap().data.extra;
    assert_eq!(extra["query"], json!("new"));
    assert_eq!(extra["top_k"], json!(5));
}

#[test]
fn update_position_moves_known_nodes_only() {
    let mut store = two_node_store();
    store.update_node_position("b", Position::new(10.0, 20.0));
    assert_eq!(store.node("b").unwrap().position, Position::new(10.0, 20.0));
    // No panic, no effect.
    store.update_node_position("ghost", Position::new(1.0, 1.0));
}

#[test]
fn remove_node_keeps_dangling_edges_and_repairs_index() {
    let mut store = two_node_store();
    store
        .add_node(Node::new("c", NodeKind::Action, Position::default()))
        .unwrap();
    store.add_edge(Edge::new("e1", "a", "b")).unwrap();

    assert!(store.remove_node("a"));
    assert!(!store.remove_node("a"));

    // No cascade: the edge still references the removed node.
    assert_eq!(store.edges().len(), 1);
    assert!(store.node("a").is_none());

    // Later nodes remain addressable after the index shift.
    store.patch_node_data("c", NodeDataPatch::new().with_status(NodeStatus::Running));
    assert_eq!(store.node("c").unwrap().data.status, NodeStatus::Running);
    assert_eq!(store.node("b").unwrap().data.status, NodeStatus::Idle);
}

#[test]
fn reset_statuses_clears_runtime_fields() {
    let mut store = two_node_store();
    store.patch_node_data(
        "a",
        NodeDataPatch::new()
            .with_status(NodeStatus::Error)
            .with_result(json!("boom")),
    );
    store.reset_statuses();
    for node in store.nodes() {
        assert_eq!(node.data.status, NodeStatus::Idle);
        assert!(node.data.result.is_none());
    }
}

#[test]
fn node_serializes_kind_under_type_field() {
    let node = Node::new("a", NodeKind::Llm, Position::new(1.0, 2.0));
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["type"], json!("llm_node"));
    assert_eq!(value["data"]["status"], json!("idle"));
    assert!(value["data"].get("result").is_none());
}
