// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Change application and connection helpers used by the store.

const DRAGGING_KEY: &str = "dragging";
const EDGE_ID_PREFIX: &str = "reactflow__edge-";

/// Applies a batch of node changes in order. Unknown ids are skipped.
pub fn apply_node_changes(nodes: &mut Vec<GraphNode>, changes: &[NodeChange]) -> Delta<NodeIdTag> {
    let mut delta = Delta::default();

    for change in changes {
        match change {
            NodeChange::Add { item, index } => {
                let at = index.unwrap_or(nodes.len()).min(nodes.len());
                nodes.insert(at, item.clone());
                delta.added.push(item.id().clone());
            }
            NodeChange::Remove { id } => {
                let before = nodes.len();
                nodes.retain(|node| node.id() != id);
                if nodes.len() != before {
                    delta.removed.push(id.clone());
                }
            }
            NodeChange::Position {
                id,
                position,
                dragging,
            } => {
                let Some(node) = nodes.iter_mut().find(|node| node.id() == id) else {
                    continue;
                };
                let mut changed = false;
                if let Some(position) = position {
                    changed |= node.move_to(position);
                }
                if let Some(dragging) = dragging {
                    let value = serde_json::Value::Bool(*dragging);
                    if node.extra().get(DRAGGING_KEY) != Some(&value) {
                        node.extra_mut().insert(DRAGGING_KEY.to_owned(), value);
                        changed = true;
                    }
                }
                if changed {
                    delta.updated.push(id.clone());
                }
            }
            NodeChange::Select { id, selected } => {
                let Some(node) = nodes.iter_mut().find(|node| node.id() == id) else {
                    continue;
                };
                if node.set_selected(*selected) {
                    delta.updated.push(id.clone());
                }
            }
        }
    }

    delta
}

/// Applies a batch of edge changes in order. Unknown ids are skipped.
pub fn apply_edge_changes(edges: &mut Vec<GraphEdge>, changes: &[EdgeChange]) -> Delta<EdgeIdTag> {
    let mut delta = Delta::default();

    for change in changes {
        match change {
            EdgeChange::Add { item, index } => {
                let at = index.unwrap_or(edges.len()).min(edges.len());
                edges.insert(at, item.clone());
                delta.added.push(item.id().clone());
            }
            EdgeChange::Remove { id } => {
                let before = edges.len();
                edges.retain(|edge| edge.id() != id);
                if edges.len() != before {
                    delta.removed.push(id.clone());
                }
            }
            EdgeChange::Select { id, selected } => {
                let Some(edge) = edges.iter_mut().find(|edge| edge.id() == id) else {
                    continue;
                };
                if edge.set_selected(*selected) {
                    delta.updated.push(id.clone());
                }
            }
        }
    }

    delta
}

/// Builds the edge for a new connection.
///
/// The id follows the canvas convention `reactflow__edge-{source}{sourceHandle}-{target}{targetHandle}`.
/// Connecting the same port pair twice is allowed; the second edge gets a numeric suffix.
pub fn edge_for_connection(edges: &[GraphEdge], connection: &Connection) -> GraphEdge {
    let base = format!(
        "{}{}-{}{}",
        connection.source,
        connection.source_handle.as_deref().unwrap_or_default(),
        connection.target,
        connection.target_handle.as_deref().unwrap_or_default(),
    );

    let taken = |candidate: &str| {
        edges
            .iter()
            .any(|edge| edge.id().as_str().strip_prefix(EDGE_ID_PREFIX) == Some(candidate))
    };

    let mut suffix = 0usize;
    let mut candidate = base.clone();
    while taken(&candidate) {
        suffix += 1;
        candidate = format!("{base}-{suffix}");
    }

    GraphEdge::new(
        EdgeId::prefixed(EDGE_ID_PREFIX, candidate),
        connection.source.clone(),
        connection.source_handle.clone(),
        connection.target.clone(),
        connection.target_handle.clone(),
    )
}
