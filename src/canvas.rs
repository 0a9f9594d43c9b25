//! Pointer-to-graph coordinate mapping and the drop gesture protocol.
//!
//! The canvas collaborator draws the graph and reports gestures in screen
//! space together with its current pan/zoom [`Viewport`]. This module owns
//! the pure translation into graph space and the materialization of a
//! palette drop into a new [`Node`](crate::graph::Node).
//!
//! # Drop protocol
//!
//! A drag payload is a JSON object carrying at least a `type` field naming
//! the node kind to instantiate:
//!
//! ```json
//! {"type": "llm_node", "label": "Summarizer"}
//! ```
//!
//! On drop, [`apply_drop`] creates a node with a generated unique id, the
//! requested kind, the mapped position, and default data
//! `{label: <id>, goal: ""}` (a payload label wins when present).

use serde::Deserialize;
use uuid::Uuid;

use crate::graph::{GraphError, GraphStore, Node, NodeData};
use crate::types::{NodeKind, Position};

/// A pointer position in screen space, as reported by the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The canvas collaborator's current pan offset and zoom scale.
///
/// Invariant: `zoom > 0`. The canvas never reports a non-positive zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Position,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Position::default(),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(pan: Position, zoom: f64) -> Self {
        Self { pan, zoom }
    }
}

/// Convert a screen-space pointer position into graph space.
///
/// Pure function of the viewport's pan and zoom: the canvas renders graph
/// point `g` at screen point `g * zoom + pan`, so the inverse is
/// `(screen - pan) / zoom`.
///
/// ```rust
/// use flowloom::canvas::{screen_to_graph, ScreenPoint, Viewport};
/// use flowloom::types::Position;
///
/// let identity = Viewport::default();
/// let p = screen_to_graph(ScreenPoint::new(120.0, 80.0), &identity);
/// assert_eq!(p, Position::new(120.0, 80.0));
///
/// let panned = Viewport::new(Position::new(20.0, -40.0), 2.0);
/// let p = screen_to_graph(ScreenPoint::new(120.0, 80.0), &panned);
/// assert_eq!(p, Position::new(50.0, 60.0));
/// ```
#[must_use]
pub fn screen_to_graph(point: ScreenPoint, viewport: &Viewport) -> Position {
    Position::new(
        (point.x - viewport.pan.x) / viewport.zoom,
        (point.y - viewport.pan.y) / viewport.zoom,
    )
}

/// The JSON payload carried by a palette drag.
#[derive(Clone, Debug, Deserialize)]
pub struct DropPayload {
    /// Wire name of the node kind to instantiate.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Optional label override; defaults to the generated node id.
    #[serde(default)]
    pub label: Option<String>,
}

impl DropPayload {
    /// Parse a drag payload from its JSON encoding.
    pub fn parse(raw: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Materialize a drop gesture into a new node in the store.
///
/// Parses the drag payload, maps the pointer position through the viewport,
/// generates a unique node id, and inserts the node with default data.
/// Returns the new node's id.
pub fn apply_drop(
    store: &mut GraphStore,
    raw_payload: &str,
    point: ScreenPoint,
    viewport: &Viewport,
) -> Result<String, GraphError> {
    let payload = DropPayload::parse(raw_payload)?;
    let id = Uuid::new_v4().to_string();
    let position = screen_to_graph(point, viewport);

    let label = payload.label.unwrap_or_else(|| id.clone());
    let node = Node::new(id.clone(), payload.kind, position).with_data(NodeData::new(label));
    store.add_node(node)?;

    tracing::debug!(node_id = %id, x = position.x, y = position.y, "node created from drop");
    Ok(id)
}
