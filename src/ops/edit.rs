// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Validated edits coming from the palette, the property panel and the port/blackboard editors.
//!
//! Each edit either applies completely or leaves the store untouched and returns the
//! user-facing reason.

use serde_json::Value;
use tracing::debug;

use crate::config::DocumentDefaults;
use crate::model::{
    GraphNode, IdError, NodeData, NodeDataPatch, NodeId, NodeKind, NodeRootPatch, NodeType,
    variable_id_from_name, PortBinding, PortMap, Position, Variable, VariableCategory,
    VariableId, VariableType,
};
use crate::pipeline::{normalize, parse_payload, LoadError};
use crate::store::{ProcessStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Process can have only one start node.")]
    DuplicateStartNode,
    #[error("Port names cannot be empty.")]
    EmptyPortName,
    #[error("Variable names cannot be empty.")]
    EmptyVariableName,
    #[error("node `{0}` does not exist")]
    UnknownNode(NodeId),
    #[error("Invalid JSON file")]
    InvalidDocument(#[source] LoadError),
    #[error("Invalid JSON file")]
    EmptyDocument,
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Inputs,
    Outputs,
}

/// One row of the port editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortRow {
    pub name: String,
    /// Empty when the port is not bound.
    pub variable_id: String,
    pub port_type: String,
}

/// One row of the blackboard editor. Rows without an id get one derived from the name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableRow {
    pub id: Option<String>,
    pub name: String,
    pub var_type: VariableType,
    pub default_value: Option<Value>,
    pub category: Option<VariableCategory>,
}

/// Palette entries in display order.
pub fn palette() -> impl Iterator<Item = (NodeType, &'static str)> {
    NodeType::ALL
        .into_iter()
        .map(|node_type| (node_type, node_type.palette_label()))
}

/// Drops a new node on the canvas.
///
/// A process has at most one start node; a second one is refused.
pub fn place_node(
    store: &mut ProcessStore,
    node_type: NodeType,
    position: Position,
    label: Option<&str>,
) -> Result<NodeId, EditError> {
    if node_type == NodeType::Start && store.has_start_node() {
        return Err(EditError::DuplicateStartNode);
    }

    let label = match label {
        Some(label) if !label.is_empty() => label.to_owned(),
        _ => format!("{node_type} node"),
    };
    let id = store.next_node_id(node_type);
    store.add_node(GraphNode::new(
        id.clone(),
        NodeKind::from(node_type),
        Some(position),
        NodeData::with_label(label),
    ));
    debug!(node_id = %id, node_type = %node_type, "placed node");
    Ok(id)
}

pub fn edit_label(store: &mut ProcessStore, node_id: &NodeId, label: &str) -> bool {
    store.update_node(
        node_id,
        NodeDataPatch {
            label: Some(label.to_owned()),
            ..NodeDataPatch::default()
        },
    )
}

pub fn edit_note(store: &mut ProcessStore, node_id: &NodeId, note: &str) -> bool {
    store.update_node(
        node_id,
        NodeDataPatch {
            note: Some(note.to_owned()),
            ..NodeDataPatch::default()
        },
    )
}

/// Sets the node's external reference: the Java class of an action node or the target process
/// of a call node. Other node types have no reference and are left alone.
pub fn edit_reference(store: &mut ProcessStore, node_id: &NodeId, target: &str) -> bool {
    let patch = match store.node(node_id).map(GraphNode::kind) {
        Some(NodeKind::Action { .. }) => NodeRootPatch {
            java_class_name: Some(target.to_owned()),
            ..NodeRootPatch::default()
        },
        Some(NodeKind::CallProcess { .. }) => NodeRootPatch {
            call_to_process: Some(target.to_owned()),
            ..NodeRootPatch::default()
        },
        _ => return false,
    };
    store.update_node_root(node_id, patch)
}

/// Replaces a node's inputs or outputs with the editor rows.
///
/// Names are trimmed; a later row with the same name wins.
pub fn save_ports(
    store: &mut ProcessStore,
    node_id: &NodeId,
    direction: PortDirection,
    rows: &[PortRow],
) -> Result<bool, EditError> {
    if store.node(node_id).is_none() {
        return Err(EditError::UnknownNode(node_id.clone()));
    }
    if rows.iter().any(|row| row.name.trim().is_empty()) {
        return Err(EditError::EmptyPortName);
    }

    let mut ports = PortMap::new();
    for row in rows {
        ports.insert(
            row.name.trim().to_owned(),
            PortBinding::new(row.variable_id.clone(), row.port_type.clone()),
        );
    }

    let patch = match direction {
        PortDirection::Inputs => NodeDataPatch {
            inputs: Some(ports),
            ..NodeDataPatch::default()
        },
        PortDirection::Outputs => NodeDataPatch {
            outputs: Some(ports),
            ..NodeDataPatch::default()
        },
    };
    Ok(store.update_node(node_id, patch))
}

/// Replaces the blackboard with the editor rows.
///
/// Fields the editor does not show are carried over from the variable with the same id.
pub fn save_variables(store: &mut ProcessStore, rows: Vec<VariableRow>) -> Result<bool, EditError> {
    if rows.iter().any(|row| row.name.trim().is_empty()) {
        return Err(EditError::EmptyVariableName);
    }

    let mut variables = Vec::with_capacity(rows.len());
    for row in rows {
        let id = match row.id {
            Some(id) if !id.is_empty() => id,
            _ => variable_id_from_name(&row.name),
        };
        let id = VariableId::new(id)?;
        let extra = store
            .variable(&id)
            .map(Variable::unknown_fields)
            .unwrap_or_default();

        let mut variable = Variable::new(id, row.name, row.var_type)
            .with_category(row.category.unwrap_or_default());
        variable.default_value = row.default_value;
        variable.extra = extra;
        variables.push(variable);
    }

    Ok(store.set_variables(variables)?)
}

/// Replaces the store with a document read from a user-chosen file.
///
/// Unlike host updates, an unreadable document is refused and the store keeps its state.
pub fn import_document_text(
    store: &mut ProcessStore,
    text: &str,
    defaults: &DocumentDefaults,
) -> Result<(), EditError> {
    let doc = parse_payload(text)
        .map_err(EditError::InvalidDocument)?
        .ok_or(EditError::EmptyDocument)?;
    let loaded = normalize(doc, defaults, store.ids());
    store.load(loaded);
    Ok(())
}
