// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The authoritative in-memory process state and its on-disk file.
//!
//! `ProcessStore` is an explicit value owned by whoever drives the editor. Every mutation that
//! changes something bumps the revision and notifies subscribers synchronously, in registration
//! order.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::DocumentDefaults;
use crate::model::{
    EdgeId, EdgeIdTag, GraphEdge, GraphNode, IdGenerator, NodeDataPatch, NodeId, NodeIdTag,
    NodeRootPatch, NodeType, ProcessId, Variable, VariableId, VariablePatch,
};
use crate::ops::{self, Connection, Delta, EdgeChange, NodeChange};
use crate::pipeline::LoadedProcess;

pub mod process_file;

pub use process_file::{FileError, ProcessFile, WriteDurability};

/// Document-level metadata held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMeta {
    pub id: ProcessId,
    pub name: String,
    pub filename: String,
    pub process_type: String,
}

impl ProcessMeta {
    pub fn placeholder(defaults: &DocumentDefaults, ids: &IdGenerator) -> Self {
        Self {
            id: ids.process_id(),
            name: defaults.name.clone(),
            filename: defaults.filename.clone(),
            process_type: defaults.process_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("variable id `{0}` is already in use")]
    DuplicateVariable(VariableId),
}

/// Receives a read-only view of the store after every effective mutation.
pub trait StoreListener {
    fn on_change(&mut self, store: &ProcessStore);
}

impl<F> StoreListener for F
where
    F: FnMut(&ProcessStore),
{
    fn on_change(&mut self, store: &ProcessStore) {
        self(store)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

pub struct ProcessStore {
    meta: ProcessMeta,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    variables: Vec<Variable>,
    viewport: Option<Value>,
    blackboard_extra: Map<String, Value>,
    extra: Map<String, Value>,
    rev: u64,
    ids: IdGenerator,
    listeners: Vec<(Subscription, Box<dyn StoreListener>)>,
    next_subscription: u64,
}

impl fmt::Debug for ProcessStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessStore")
            .field("meta", &self.meta)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("variables", &self.variables.len())
            .field("rev", &self.rev)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ProcessStore {
    fn default() -> Self {
        Self::new(&DocumentDefaults::default())
    }
}

impl ProcessStore {
    pub fn new(defaults: &DocumentDefaults) -> Self {
        Self::with_ids(defaults, IdGenerator::new())
    }

    pub fn with_ids(defaults: &DocumentDefaults, ids: IdGenerator) -> Self {
        Self {
            meta: ProcessMeta::placeholder(defaults, &ids),
            nodes: Vec::new(),
            edges: Vec::new(),
            variables: Vec::new(),
            viewport: None,
            blackboard_extra: Map::new(),
            extra: Map::new(),
            rev: 0,
            ids,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn meta(&self) -> &ProcessMeta {
        &self.meta
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Camera state as the document carried it.
    pub fn viewport(&self) -> Option<&Value> {
        self.viewport.as_ref()
    }

    pub fn blackboard_extra(&self) -> &Map<String, Value> {
        &self.blackboard_extra
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn variable(&self, id: &VariableId) -> Option<&Variable> {
        self.variables.iter().find(|variable| &variable.id == id)
    }

    pub fn has_start_node(&self) -> bool {
        self.nodes.iter().any(GraphNode::is_start)
    }

    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.selected())
    }

    /// Mints `{type}-{token}`, unique for the lifetime of this store.
    pub fn next_node_id(&mut self, node_type: NodeType) -> NodeId {
        self.ids.next_id(node_type.as_str())
    }

    pub fn subscribe(&mut self, listener: impl StoreListener + 'static) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    /// Replaces the whole state with a normalized document.
    pub fn load(&mut self, loaded: LoadedProcess) {
        let LoadedProcess {
            meta,
            nodes,
            edges,
            variables,
            viewport,
            blackboard_extra,
            extra,
        } = loaded;

        self.meta = meta;
        self.nodes = nodes;
        self.edges = edges;
        self.variables = variables;
        self.viewport = viewport;
        self.blackboard_extra = blackboard_extra;
        self.extra = extra;
        debug!(
            process_id = %self.meta.id,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            variables = self.variables.len(),
            "loaded process"
        );
        self.commit();
    }

    /// Appends a node. Start-node uniqueness is the caller's policy.
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.push(node);
        self.commit();
    }

    /// Shallow-merges into the node's `data`. Unknown ids are a no-op.
    pub fn update_node(&mut self, id: &NodeId, patch: NodeDataPatch) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id() == id) else {
            return false;
        };
        if !node.apply_data_patch(patch) {
            return false;
        }
        self.commit();
        true
    }

    /// Shallow-merges root extension properties into the node itself. Unknown ids are a no-op.
    pub fn update_node_root(&mut self, id: &NodeId, patch: NodeRootPatch) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id() == id) else {
            return false;
        };
        if !node.apply_root_patch(patch) {
            return false;
        }
        self.commit();
        true
    }

    /// Single selection: `id` becomes the only selected node. An unknown id clears selection.
    pub fn select_node(&mut self, id: &NodeId) -> bool {
        let mut changed = false;
        for node in &mut self.nodes {
            let selected = node.id() == id;
            changed |= node.set_selected(selected);
        }
        if changed {
            self.commit();
        }
        changed
    }

    /// Loaded documents may already repeat an id; edits never add another duplicate.
    pub fn add_variable(&mut self, variable: Variable) -> Result<(), StoreError> {
        if self.variable(&variable.id).is_some() {
            return Err(StoreError::DuplicateVariable(variable.id));
        }
        self.variables.push(variable);
        self.commit();
        Ok(())
    }

    pub fn update_variable(
        &mut self,
        id: &VariableId,
        patch: VariablePatch,
    ) -> Result<bool, StoreError> {
        if let Some(new_id) = &patch.id {
            if new_id != id && self.variable(new_id).is_some() {
                return Err(StoreError::DuplicateVariable(new_id.clone()));
            }
        }
        let Some(variable) = self.variables.iter_mut().find(|variable| &variable.id == id) else {
            return Ok(false);
        };
        if !variable.apply_patch(patch) {
            return Ok(false);
        }
        self.commit();
        Ok(true)
    }

    /// Ports bound to the removed variable keep their (now dangling) binding.
    pub fn remove_variable(&mut self, id: &VariableId) -> bool {
        let before = self.variables.len();
        self.variables.retain(|variable| &variable.id != id);
        if self.variables.len() == before {
            return false;
        }
        self.commit();
        true
    }

    /// Bulk replace. Rejected as a whole if two entries share an id.
    pub fn set_variables(&mut self, variables: Vec<Variable>) -> Result<bool, StoreError> {
        for (idx, variable) in variables.iter().enumerate() {
            if variables[..idx].iter().any(|other| other.id == variable.id) {
                return Err(StoreError::DuplicateVariable(variable.id.clone()));
            }
        }
        if self.variables == variables {
            return Ok(false);
        }
        self.variables = variables;
        self.commit();
        Ok(true)
    }

    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) -> Delta<NodeIdTag> {
        let delta = ops::apply_node_changes(&mut self.nodes, changes);
        if !delta.is_empty() {
            self.commit();
        }
        delta
    }

    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) -> Delta<EdgeIdTag> {
        let delta = ops::apply_edge_changes(&mut self.edges, changes);
        if !delta.is_empty() {
            self.commit();
        }
        delta
    }

    /// Appends a new edge for the connection. Duplicate port pairs are allowed.
    pub fn connect(&mut self, connection: &Connection) -> EdgeId {
        let edge = ops::edge_for_connection(&self.edges, connection);
        let id = edge.id().clone();
        self.edges.push(edge);
        self.commit();
        id
    }

    pub fn set_process_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.meta.name == name {
            return false;
        }
        self.meta.name = name;
        self.commit();
        true
    }

    pub fn set_process_filename(&mut self, filename: impl Into<String>) -> bool {
        let filename = filename.into();
        if self.meta.filename == filename {
            return false;
        }
        self.meta.filename = filename;
        self.commit();
        true
    }

    pub fn set_process_type(&mut self, process_type: impl Into<String>) -> bool {
        let process_type = process_type.into();
        if self.meta.process_type == process_type {
            return false;
        }
        self.meta.process_type = process_type;
        self.commit();
        true
    }

    pub fn set_viewport(&mut self, viewport: Option<Value>) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        self.commit();
        true
    }

    fn commit(&mut self) {
        self.rev = self.rev.wrapping_add(1);
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener.on_change(self);
        }
        self.listeners = listeners;
    }
}
