//! Wire shapes for run progress: the streaming event records and the legacy
//! aggregate response form.
//!
//! The runner emits one JSON record per line:
//!
//! ```json
//! {"type": "start", "node_id": "a"}
//! {"type": "result", "node_id": "a", "result": "42"}
//! {"type": "error", "node_id": "b", "error": "timeout"}
//! {"type": "end"}
//! ```
//!
//! Older deployments return one aggregate JSON object instead; see
//! [`AggregateOutcome`].

use serde::Deserialize;
use serde_json::Value;

use crate::types::NodeStatus;

/// One decoded record from the execution stream.
///
/// Modeled as a closed sum with exhaustive dispatch; records whose `type`
/// tag is not recognized land in [`Unknown`](Self::Unknown) so the caller
/// can discard them explicitly instead of failing the run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// The node began executing.
    Start { node_id: String },
    /// The node completed; `result` may be any JSON value.
    Result { node_id: String, result: Value },
    /// The node failed, or — with no `node_id` — the run itself reported
    /// an error.
    Error {
        #[serde(default)]
        node_id: Option<String>,
        error: String,
    },
    /// The run is complete; no further events follow.
    End,
    /// Forward-compatibility fallback for unrecognized tags.
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Parse one candidate record. `None` for empty/whitespace-only lines,
    /// `Err` for lines that are not a valid event record.
    pub fn parse_line(line: &str) -> Option<Result<Self, serde_json::Error>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(serde_json::from_str(trimmed))
    }
}

/// One entry of the legacy aggregate response's `node_runs` array.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeRun {
    pub node_id: String,
    pub status: NodeStatus,
    #[serde(default)]
    pub output_preview: Option<String>,
}

/// The legacy, non-streaming response form: everything at once.
///
/// `results` values are either the bare result or wrapped as
/// `{"result": ...}`; [`result_for`](Self::result_for) normalizes both.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AggregateOutcome {
    #[serde(default)]
    pub node_runs: Vec<NodeRun>,
    #[serde(default)]
    pub results: serde_json::Map<String, Value>,
}

impl AggregateOutcome {
    /// The result payload recorded for a node, unwrapped if nested.
    #[must_use]
    pub fn result_for(&self, node_id: &str) -> Option<Value> {
        let raw = self.results.get(node_id)?;
        match raw {
            Value::Object(map) if map.contains_key("result") => map.get("result").cloned(),
            other => Some(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_each_known_tag() {
        let start = StreamEvent::parse_line(r#"{"type":"start","node_id":"a"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(start, StreamEvent::Start { node_id: "a".into() });

        let result = StreamEvent::parse_line(r#"{"type":"result","node_id":"a","result":"42"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            result,
            StreamEvent::Result {
                node_id: "a".into(),
                result: json!("42"),
            }
        );

        let end = StreamEvent::parse_line(r#"{"type":"end"}"#).unwrap().unwrap();
        assert_eq!(end, StreamEvent::End);
    }

    #[test]
    fn error_without_node_id_is_run_level() {
        let event = StreamEvent::parse_line(r#"{"type":"error","error":"runner died"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                node_id: None,
                error: "runner died".into(),
            }
        );
    }

    #[test]
    fn unknown_tag_falls_back_instead_of_failing() {
        let event = StreamEvent::parse_line(r#"{"type":"heartbeat","at":5}"#)
            .unwrap()
            .unwrap();
        assert_eq!(event, StreamEvent::Unknown);
    }

    #[test]
    fn blank_lines_are_skipped_and_garbage_is_an_error() {
        assert!(StreamEvent::parse_line("   ").is_none());
        assert!(StreamEvent::parse_line("\t").is_none());
        assert!(StreamEvent::parse_line("{not json").unwrap().is_err());
    }

    #[test]
    fn aggregate_results_unwrap_nested_form() {
        let outcome: AggregateOutcome = serde_json::from_value(json!({
            "node_runs": [
                {"node_id": "a", "status": "success", "output_preview": "42"},
                {"node_id": "b", "status": "error"}
            ],
            "results": {
                "a": {"result": "42"},
                "b": "bare"
            }
        }))
        .unwrap();

        assert_eq!(outcome.node_runs.len(), 2);
        assert_eq!(outcome.result_for("a"), Some(json!("42")));
        assert_eq!(outcome.result_for("b"), Some(json!("bare")));
        assert_eq!(outcome.result_for("ghost"), None);
    }
}
