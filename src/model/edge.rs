// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::de::{present, take_typed};
use super::ids::{EdgeId, NodeId};

/// Visual-only edge fields re-derived by the renderer; never kept from input.
pub const RENDER_STATE_KEYS: [&str; 2] = ["markerEnd", "style"];

const SOURCE_HANDLE_KEY: &str = "sourceHandle";
const TARGET_HANDLE_KEY: &str = "targetHandle";
const SELECTED_KEY: &str = "selected";

/// A directed connection between two nodes, optionally between two specific ports.
///
/// Only `id`, `source` and `target` must be readable; a handle or flag of another shape stays in
/// `extra` as it came.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_handle: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_handle: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for GraphEdge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = LooseEdge::deserialize(deserializer)?;
        let mut extra = raw.extra;
        Ok(Self {
            id: raw.id,
            source: raw.source,
            target: raw.target,
            source_handle: take_typed(raw.source_handle, SOURCE_HANDLE_KEY, &mut extra),
            target_handle: take_typed(raw.target_handle, TARGET_HANDLE_KEY, &mut extra),
            selected: take_typed(raw.selected, SELECTED_KEY, &mut extra),
            extra,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    #[serde(default, deserialize_with = "present")]
    source_handle: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    target_handle: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    selected: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl GraphEdge {
    pub fn new(
        id: EdgeId,
        source: NodeId,
        source_handle: Option<String>,
        target: NodeId,
        target_handle: Option<String>,
    ) -> Self {
        Self {
            id,
            source,
            target,
            source_handle: Some(source_handle),
            target_handle: Some(target_handle),
            selected: None,
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn source_handle(&self) -> Option<&str> {
        self.source_handle.as_ref().and_then(Option::as_deref)
    }

    pub fn target_handle(&self) -> Option<&str> {
        self.target_handle.as_ref().and_then(Option::as_deref)
    }

    pub fn selected(&self) -> bool {
        self.selected.unwrap_or(false)
    }

    pub fn set_selected(&mut self, selected: bool) -> bool {
        let replaced_raw = self.extra.remove(SELECTED_KEY).is_some();
        if self.selected() == selected && !replaced_raw {
            return false;
        }
        self.selected = Some(selected);
        true
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Drops `markerEnd`/`style`. Returns `true` if anything was removed.
    pub fn strip_render_state(&mut self) -> bool {
        let mut stripped = false;
        for key in RENDER_STATE_KEYS {
            stripped |= self.extra.remove(key).is_some();
        }
        stripped
    }
}
