//! A full editor session: palette drops, a connect gesture, a run, and the
//! projected render props the canvas would draw.

mod common;

use common::ScriptedTransport;

use serde_json::json;

use flowloom::canvas::{ScreenPoint, Viewport, apply_drop, screen_to_graph};
use flowloom::graph::{Edge, GraphStore};
use flowloom::run::{PREVIEW_MAX_CHARS, RunReconciler, StatusColor, project};
use flowloom::types::{NodeKind, Position};

#[tokio::test]
async fn drop_connect_run_and_project() {
    let mut store = GraphStore::new();
    let viewport = Viewport::new(Position::new(10.0, 10.0), 2.0);

    let llm = apply_drop(
        &mut store,
        r#"{"type": "llm_node", "label": "Draft"}"#,
        ScreenPoint::new(110.0, 110.0),
        &viewport,
    )
    .unwrap();
    let rag = apply_drop(
        &mut store,
        r#"{"type": "rag_node"}"#,
        ScreenPoint::new(310.0, 110.0),
        &viewport,
    )
    .unwrap();

    assert_eq!(store.node(&llm).unwrap().kind, NodeKind::Llm);
    assert_eq!(
        store.node(&llm).unwrap().position,
        screen_to_graph(ScreenPoint::new(110.0, 110.0), &viewport)
    );

    store.add_edge(Edge::new("e1", llm.clone(), rag.clone())).unwrap();

    let body = format!(
        "{}\n{}\n{}\n{}\n{}\n",
        json!({"type": "start", "node_id": llm}),
        json!({"type": "result", "node_id": llm, "result": "drafted three options"}),
        json!({"type": "start", "node_id": rag}),
        json!({"type": "error", "node_id": rag, "error": "index unavailable"}),
        json!({"type": "end"}),
    );
    let mut reconciler = RunReconciler::new(ScriptedTransport::whole(&body));
    let report = reconciler.start_run(&mut store).await.unwrap();
    assert_eq!(report.events_applied, 4);

    let llm_props = project(&store.node(&llm).unwrap().data, PREVIEW_MAX_CHARS);
    assert_eq!(llm_props.status_color, StatusColor::Success);
    assert_eq!(llm_props.preview_text, "drafted three options");

    let rag_props = project(&store.node(&rag).unwrap().data, PREVIEW_MAX_CHARS);
    assert_eq!(rag_props.status_color, StatusColor::Failure);
    assert_eq!(rag_props.preview_text, "index unavailable");
}
