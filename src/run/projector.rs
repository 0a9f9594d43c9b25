//! Pure projection from a node's data record to render properties.
//!
//! The canvas collaborator draws nodes from [`RenderProps`]; this module is
//! the only place that decides how a runtime status looks. No state, no
//! side effects, table-driven.

use serde_json::Value;

use crate::graph::NodeData;
use crate::types::NodeStatus;

/// Default preview bound, in characters.
pub const PREVIEW_MAX_CHARS: usize = 120;

/// The visual bucket a node's status maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusColor {
    Neutral,
    InProgress,
    Success,
    Failure,
}

/// What the canvas needs to draw one node's status.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderProps {
    pub status_color: StatusColor,
    pub preview_text: String,
}

/// Project a node's data record into render properties.
///
/// ```rust
/// use flowloom::graph::NodeData;
/// use flowloom::run::{project, StatusColor, PREVIEW_MAX_CHARS};
///
/// let props = project(&NodeData::new("a"), PREVIEW_MAX_CHARS);
/// assert_eq!(props.status_color, StatusColor::Neutral);
/// assert!(props.preview_text.is_empty());
/// ```
#[must_use]
pub fn project(data: &NodeData, max_chars: usize) -> RenderProps {
    match data.status {
        NodeStatus::Idle => RenderProps {
            status_color: StatusColor::Neutral,
            preview_text: String::new(),
        },
        NodeStatus::Running => RenderProps {
            status_color: StatusColor::InProgress,
            preview_text: "running…".to_string(),
        },
        NodeStatus::Success => RenderProps {
            status_color: StatusColor::Success,
            preview_text: truncate(&preview_of(data.result.as_ref()), max_chars),
        },
        NodeStatus::Error => RenderProps {
            status_color: StatusColor::Failure,
            preview_text: truncate(&preview_of(data.result.as_ref()), max_chars),
        },
    }
}

/// String results render verbatim; anything else is compact-serialized.
fn preview_of(result: Option<&Value>) -> String {
    match result {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Truncate at a char boundary and mark the cut with an ellipsis.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
