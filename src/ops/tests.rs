// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use serde_json::json;

use crate::model::{EdgeId, GraphEdge, GraphNode, NodeData, NodeId, NodeKind, NodeType, Position};

use super::{
    apply_edge_changes, apply_node_changes, edge_for_connection, Connection, EdgeChange,
    NodeChange,
};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

fn node(id: &str) -> GraphNode {
    GraphNode::new(
        nid(id),
        NodeKind::from(NodeType::Assign),
        Some(Position::new(0.0, 0.0)),
        NodeData::with_label(id),
    )
}

#[fixture]
fn nodes() -> Vec<GraphNode> {
    vec![node("a"), node("b"), node("c")]
}

fn ids(nodes: &[GraphNode]) -> Vec<&str> {
    nodes.iter().map(|node| node.id().as_str()).collect()
}

#[test]
fn node_changes_read_canvas_wire_format() {
    let changes: Vec<NodeChange> = serde_json::from_value(json!([
        {"type": "position", "id": "a", "position": {"x": 5, "y": 6}, "dragging": true},
        {"type": "position", "id": "a", "dragging": false},
        {"type": "select", "id": "b", "selected": true},
        {"type": "remove", "id": "c"}
    ]))
    .expect("changes");

    assert_eq!(
        changes[0],
        NodeChange::Position {
            id: nid("a"),
            position: Some(Position::new(5.0, 6.0)),
            dragging: Some(true),
        }
    );
    assert_eq!(
        changes[1],
        NodeChange::Position {
            id: nid("a"),
            position: None,
            dragging: Some(false),
        }
    );
    assert_eq!(changes[3], NodeChange::Remove { id: nid("c") });
}

#[rstest]
fn drag_updates_position_and_dragging_flag(mut nodes: Vec<GraphNode>) {
    let delta = apply_node_changes(
        &mut nodes,
        &[
            NodeChange::Position {
                id: nid("a"),
                position: Some(Position::new(40.0, 80.0)),
                dragging: Some(true),
            },
            NodeChange::Position {
                id: nid("a"),
                position: None,
                dragging: Some(false),
            },
        ],
    );

    assert_eq!(delta.updated, vec![nid("a"), nid("a")]);
    assert_eq!(nodes[0].position(), Some(&Position::new(40.0, 80.0)));
    assert_eq!(nodes[0].extra().get("dragging"), Some(&json!(false)));
}

#[rstest]
fn unchanged_position_is_not_reported(mut nodes: Vec<GraphNode>) {
    let delta = apply_node_changes(
        &mut nodes,
        &[NodeChange::Position {
            id: nid("b"),
            position: Some(Position::new(0.0, 0.0)),
            dragging: None,
        }],
    );
    assert!(delta.is_empty());
}

#[rstest]
#[case(Some(0), vec!["n", "a", "b", "c"])]
#[case(Some(1), vec!["a", "n", "b", "c"])]
#[case(Some(99), vec!["a", "b", "c", "n"])]
#[case(None, vec!["a", "b", "c", "n"])]
fn add_inserts_at_clamped_index(
    mut nodes: Vec<GraphNode>,
    #[case] index: Option<usize>,
    #[case] expected: Vec<&str>,
) {
    let delta = apply_node_changes(
        &mut nodes,
        &[NodeChange::Add {
            item: node("n"),
            index,
        }],
    );
    assert_eq!(delta.added, vec![nid("n")]);
    assert_eq!(ids(&nodes), expected);
}

#[rstest]
fn unknown_ids_are_skipped(mut nodes: Vec<GraphNode>) {
    let delta = apply_node_changes(
        &mut nodes,
        &[
            NodeChange::Remove { id: nid("zzz") },
            NodeChange::Select {
                id: nid("zzz"),
                selected: true,
            },
            NodeChange::Remove { id: nid("b") },
        ],
    );
    assert_eq!(delta.removed, vec![nid("b")]);
    assert!(delta.updated.is_empty());
    assert_eq!(ids(&nodes), vec!["a", "c"]);
}

#[test]
fn edge_changes_remove_and_select() {
    let mut edges = vec![
        GraphEdge::new(eid("e1"), nid("a"), None, nid("b"), None),
        GraphEdge::new(eid("e2"), nid("b"), None, nid("c"), None),
    ];
    let changes: Vec<EdgeChange> = serde_json::from_value(json!([
        {"type": "select", "id": "e2", "selected": true},
        {"type": "remove", "id": "e1"}
    ]))
    .expect("changes");

    let delta = apply_edge_changes(&mut edges, &changes);
    assert_eq!(delta.updated, vec![eid("e2")]);
    assert_eq!(delta.removed, vec![eid("e1")]);
    assert_eq!(edges.len(), 1);
    assert!(edges[0].selected());
}

#[test]
fn connection_ids_include_handles_and_never_collide() {
    let connection = Connection::new(nid("actionNode-2"), nid("assignNode-3"))
        .with_handles(Some("out"), Some("in"));

    let mut edges = Vec::new();
    for _ in 0..3 {
        let edge = edge_for_connection(&edges, &connection);
        edges.push(edge);
    }

    let ids = edges
        .iter()
        .map(|edge| edge.id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec![
            "reactflow__edge-actionNode-2out-assignNode-3in",
            "reactflow__edge-actionNode-2out-assignNode-3in-1",
            "reactflow__edge-actionNode-2out-assignNode-3in-2",
        ]
    );
    assert_eq!(edges[0].source_handle(), Some("out"));
}

#[test]
fn connection_wire_format_defaults_missing_handles() {
    let connection: Connection =
        serde_json::from_value(json!({"source": "a", "target": "b"})).expect("connection");
    assert_eq!(connection, Connection::new(nid("a"), nid("b")));

    let edge = edge_for_connection(&[], &connection);
    assert_eq!(edge.id().as_str(), "reactflow__edge-a-b");
}
