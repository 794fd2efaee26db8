// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::de::{js_number, present, take_typed};
use super::ids::NodeId;

pub const JAVA_CLASS_NAME_KEY: &str = "javaClassName";
pub const CALL_TO_PROCESS_KEY: &str = "callToProcess";
const TYPE_KEY: &str = "type";
const POSITION_KEY: &str = "position";
const DATA_KEY: &str = "data";
const SELECTED_KEY: &str = "selected";
const LABEL_KEY: &str = "label";
const INPUTS_KEY: &str = "inputs";
const OUTPUTS_KEY: &str = "outputs";
const NOTE_KEY: &str = "note";
const LEGACY_CALL_PROCESS_TYPE: &str = "callProcessNode";

/// The node types the editor knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Start,
    Action,
    Assign,
    CallProcess,
    Note,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Start,
        NodeType::Action,
        NodeType::Assign,
        NodeType::CallProcess,
        NodeType::Note,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "startNode",
            Self::Action => "actionNode",
            Self::Assign => "assignNode",
            Self::CallProcess => "calltoProcessNode",
            Self::Note => "noteNode",
        }
    }

    /// Accepts the canonical spelling and the legacy `callProcessNode` alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "startNode" => Some(Self::Start),
            "actionNode" => Some(Self::Action),
            "assignNode" => Some(Self::Assign),
            "calltoProcessNode" | LEGACY_CALL_PROCESS_TYPE => Some(Self::CallProcess),
            "noteNode" => Some(Self::Note),
            _ => None,
        }
    }

    pub fn palette_label(self) -> &'static str {
        match self {
            Self::Start => "Start Node",
            Self::Action => "Action Node",
            Self::Assign => "Assign Node",
            Self::CallProcess => "Call Process",
            Self::Note => "Note",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The node's type together with the root-level properties that only that type carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Start,
    Action {
        java_class_name: Option<String>,
    },
    Assign,
    CallProcess {
        call_to_process: Option<String>,
        /// Written back as `callProcessNode` instead of the canonical spelling.
        legacy_alias: bool,
    },
    Note,
    /// Unrecognized (or missing) `type`; passed through untouched.
    Other(Option<String>),
}

impl NodeKind {
    pub fn node_type(&self) -> Option<NodeType> {
        match self {
            Self::Start => Some(NodeType::Start),
            Self::Action { .. } => Some(NodeType::Action),
            Self::Assign => Some(NodeType::Assign),
            Self::CallProcess { .. } => Some(NodeType::CallProcess),
            Self::Note => Some(NodeType::Note),
            Self::Other(_) => None,
        }
    }

    /// The `type` string as it appears in the document.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::CallProcess {
                legacy_alias: true, ..
            } => Some(LEGACY_CALL_PROCESS_TYPE),
            Self::Other(name) => name.as_deref(),
            kind => kind.node_type().map(NodeType::as_str),
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }
}

impl From<NodeType> for NodeKind {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Start => Self::Start,
            NodeType::Action => Self::Action {
                java_class_name: None,
            },
            NodeType::Assign => Self::Assign,
            NodeType::CallProcess => Self::CallProcess {
                call_to_process: None,
                legacy_alias: false,
            },
            NodeType::Note => Self::Note,
        }
    }
}

/// Canvas coordinates. Keys other than `x` and `y` are carried along untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    #[serde(serialize_with = "js_number")]
    pub x: f64,
    #[serde(serialize_with = "js_number")]
    pub y: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            extra: Map::new(),
        }
    }
}

/// One named port, optionally bound to a blackboard variable.
///
/// The binding is never validated: a port may point at a variable that no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub port_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PortBinding {
    pub fn new(variable_id: impl Into<String>, port_type: impl Into<String>) -> Self {
        Self {
            variable_id: Some(variable_id.into()),
            port_type: Some(port_type.into()),
            extra: Map::new(),
        }
    }
}

/// Port name to binding, in declaration order.
pub type PortMap = IndexMap<String, PortBinding>;

/// The nested `data` bag of a node.
///
/// A known key holding a value of another shape (a numeric `label`, say) is kept in `extra` and
/// written back as it came; setting the field through a patch replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<PortMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<PortMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeData {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Shallow merge: every field set on the patch replaces the current value.
    pub fn apply_patch(&mut self, patch: NodeDataPatch) -> bool {
        let mut changed = false;
        changed |= patch_field(&mut self.label, &mut self.extra, LABEL_KEY, patch.label);
        changed |= patch_field(&mut self.inputs, &mut self.extra, INPUTS_KEY, patch.inputs);
        changed |= patch_field(&mut self.outputs, &mut self.extra, OUTPUTS_KEY, patch.outputs);
        changed |= patch_field(&mut self.note, &mut self.extra, NOTE_KEY, patch.note);
        for (key, value) in patch.extra {
            if self.extra.get(&key) != Some(&value) {
                self.extra.insert(key, value);
                changed = true;
            }
        }
        changed
    }
}

impl<'de> Deserialize<'de> for NodeData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = LooseNodeData::deserialize(deserializer)?;
        let mut extra = raw.extra;
        Ok(Self {
            label: take_typed(raw.label, LABEL_KEY, &mut extra),
            inputs: take_typed(raw.inputs, INPUTS_KEY, &mut extra),
            outputs: take_typed(raw.outputs, OUTPUTS_KEY, &mut extra),
            note: take_typed(raw.note, NOTE_KEY, &mut extra),
            extra,
        })
    }
}

#[derive(Deserialize)]
struct LooseNodeData {
    #[serde(default, deserialize_with = "present")]
    label: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    inputs: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    outputs: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    note: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub inputs: Option<PortMap>,
    pub outputs: Option<PortMap>,
    pub note: Option<String>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRootPatch {
    pub java_class_name: Option<String>,
    pub call_to_process: Option<String>,
}

/// What activating a node should open in the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossReference {
    JavaClass(String),
    Process(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LooseNode", into = "RawNode")]
pub struct GraphNode {
    id: NodeId,
    kind: NodeKind,
    position: Option<Position>,
    data: NodeData,
    selected: Option<bool>,
    extra: Map<String, Value>,
}

impl GraphNode {
    pub fn new(id: NodeId, kind: NodeKind, position: Option<Position>, data: NodeData) -> Self {
        Self {
            id,
            kind,
            position,
            data,
            selected: None,
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.kind.node_type()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.kind.type_name()
    }

    pub fn is_start(&self) -> bool {
        self.kind.is_start()
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    /// Moves the node, keeping position keys the canvas did not send. Returns `true` if
    /// anything changed.
    pub fn move_to(&mut self, position: &Position) -> bool {
        let Some(current) = self.position.as_mut() else {
            self.position = Some(position.clone());
            return true;
        };
        let mut changed = current.x != position.x || current.y != position.y;
        current.x = position.x;
        current.y = position.y;
        for (key, value) in &position.extra {
            if current.extra.get(key) != Some(value) {
                current.extra.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label.as_deref()
    }

    pub fn selected(&self) -> bool {
        self.selected.unwrap_or(false)
    }

    /// Returns `true` if the flag changed. Clearing a flag that was never set leaves it unset.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.selected() == selected {
            return false;
        }
        self.selected = Some(selected);
        true
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }

    pub fn java_class_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Action { java_class_name } => java_class_name.as_deref(),
            _ => None,
        }
    }

    pub fn call_to_process(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::CallProcess {
                call_to_process, ..
            } => call_to_process.as_deref(),
            _ => None,
        }
    }

    pub fn apply_data_patch(&mut self, patch: NodeDataPatch) -> bool {
        let replaced_raw = self.extra.remove(DATA_KEY).is_some();
        self.data.apply_patch(patch) || replaced_raw
    }

    /// Shallow merge into the node root.
    ///
    /// A property that belongs to a different node type is kept as a plain root field.
    pub fn apply_root_patch(&mut self, patch: NodeRootPatch) -> bool {
        let mut changed = false;
        if let Some(value) = patch.java_class_name {
            changed |= match &mut self.kind {
                NodeKind::Action { java_class_name } => {
                    self.extra.remove(JAVA_CLASS_NAME_KEY);
                    replace_if_changed(java_class_name, Some(value))
                }
                _ => insert_if_changed(&mut self.extra, JAVA_CLASS_NAME_KEY, value),
            };
        }
        if let Some(value) = patch.call_to_process {
            changed |= match &mut self.kind {
                NodeKind::CallProcess {
                    call_to_process, ..
                } => {
                    self.extra.remove(CALL_TO_PROCESS_KEY);
                    replace_if_changed(call_to_process, Some(value))
                }
                _ => insert_if_changed(&mut self.extra, CALL_TO_PROCESS_KEY, value),
            };
        }
        changed
    }

    /// Action nodes fall back to a `javaClassName` stored in `data` by older editors.
    pub fn cross_reference(&self) -> Option<CrossReference> {
        match &self.kind {
            NodeKind::Action { java_class_name } => java_class_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .or_else(|| {
                    self.data
                        .extra
                        .get(JAVA_CLASS_NAME_KEY)
                        .and_then(Value::as_str)
                })
                .filter(|name| !name.trim().is_empty())
                .map(|name| CrossReference::JavaClass(name.to_owned())),
            NodeKind::CallProcess {
                call_to_process, ..
            } => call_to_process
                .as_deref()
                .filter(|target| !target.trim().is_empty())
                .map(|target| CrossReference::Process(target.to_owned())),
            _ => None,
        }
    }
}

impl JsonSchema for GraphNode {
    fn schema_name() -> Cow<'static, str> {
        "GraphNode".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        RawNode::json_schema(generator)
    }
}

/// The wire shape of a node: root extension properties sit beside `data`, not inside it.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: NodeId,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<NodeData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    java_class_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    call_to_process: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A node as read: only `id` is required, every other known key may hold anything.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseNode {
    id: NodeId,
    #[serde(rename = "type", default, deserialize_with = "present")]
    node_type: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    position: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    java_class_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    call_to_process: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    selected: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<LooseNode> for GraphNode {
    fn from(raw: LooseNode) -> Self {
        let mut extra = raw.extra;
        let type_name: Option<String> = take_typed(raw.node_type, TYPE_KEY, &mut extra);
        let parsed = type_name.as_deref().and_then(NodeType::parse);
        let kind = match parsed {
            Some(NodeType::Start) => NodeKind::Start,
            Some(NodeType::Action) => NodeKind::Action {
                java_class_name: take_typed(
                    raw.java_class_name.clone(),
                    JAVA_CLASS_NAME_KEY,
                    &mut extra,
                ),
            },
            Some(NodeType::Assign) => NodeKind::Assign,
            Some(NodeType::CallProcess) => NodeKind::CallProcess {
                call_to_process: take_typed(
                    raw.call_to_process.clone(),
                    CALL_TO_PROCESS_KEY,
                    &mut extra,
                ),
                legacy_alias: type_name.as_deref() == Some(LEGACY_CALL_PROCESS_TYPE),
            },
            Some(NodeType::Note) => NodeKind::Note,
            None => NodeKind::Other(type_name),
        };

        if !matches!(kind, NodeKind::Action { .. }) {
            if let Some(value) = raw.java_class_name {
                extra.insert(JAVA_CLASS_NAME_KEY.to_owned(), value);
            }
        }
        if !matches!(kind, NodeKind::CallProcess { .. }) {
            if let Some(value) = raw.call_to_process {
                extra.insert(CALL_TO_PROCESS_KEY.to_owned(), value);
            }
        }

        let position: Option<Position> = take_typed(raw.position, POSITION_KEY, &mut extra);
        let data: NodeData = take_typed(
            raw.data.filter(|data| !data.is_null()),
            DATA_KEY,
            &mut extra,
        )
        .unwrap_or_default();
        let selected: Option<bool> = take_typed(raw.selected, SELECTED_KEY, &mut extra);

        Self {
            id: raw.id,
            kind,
            position,
            data,
            selected,
            extra,
        }
    }
}

impl From<GraphNode> for RawNode {
    fn from(node: GraphNode) -> Self {
        let node_type = node.kind.type_name().map(str::to_owned);
        let mut extra = node.extra;
        let (java_class_name, call_to_process) = match node.kind {
            NodeKind::Action { java_class_name } => (java_class_name.map(Value::String), None),
            NodeKind::CallProcess {
                call_to_process, ..
            } => (None, call_to_process.map(Value::String)),
            _ => (None, None),
        };
        // A typed value replaces the raw one it was read over.
        for (key, typed) in [
            (TYPE_KEY, node_type.is_some()),
            (POSITION_KEY, node.position.is_some()),
            (JAVA_CLASS_NAME_KEY, java_class_name.is_some()),
            (CALL_TO_PROCESS_KEY, call_to_process.is_some()),
            (SELECTED_KEY, node.selected.is_some()),
        ] {
            if typed {
                extra.remove(key);
            }
        }
        let data = if node.data == NodeData::default() && extra.contains_key(DATA_KEY) {
            None
        } else {
            extra.remove(DATA_KEY);
            Some(node.data)
        };

        Self {
            id: node.id,
            node_type,
            position: node.position,
            data,
            java_class_name,
            call_to_process,
            selected: node.selected,
            extra,
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) if slot.as_ref() != Some(&value) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}

fn patch_field<T: PartialEq>(
    slot: &mut Option<T>,
    extra: &mut Map<String, Value>,
    key: &str,
    value: Option<T>,
) -> bool {
    if value.is_none() {
        return false;
    }
    let replaced_raw = extra.remove(key).is_some();
    replace_if_changed(slot, value) || replaced_raw
}

fn insert_if_changed(extra: &mut Map<String, Value>, key: &str, value: String) -> bool {
    let value = Value::String(value);
    if extra.get(key) == Some(&value) {
        return false;
    }
    extra.insert(key.to_owned(), value);
    true
}
