// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graph topology changes reported by the canvas.
//!
//! The canvas owns node positions and edge wiring; it describes what the user did as an ordered
//! batch of change descriptors. Applying a batch mutates the lists in place and produces a
//! minimal delta so callers can tell whether anything actually changed.

use serde::{Deserialize, Serialize};

use crate::model::{EdgeId, EdgeIdTag, GraphEdge, GraphNode, Id, NodeId, NodeIdTag, Position};

pub mod edit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    Add {
        item: GraphNode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    Remove {
        id: NodeId,
    },
    /// A drag step. `position` is absent on the final "drag stopped" change.
    Position {
        id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dragging: Option<bool>,
    },
    Select {
        id: NodeId,
        selected: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeChange {
    Add {
        item: GraphEdge,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    Remove {
        id: EdgeId,
    },
    Select {
        id: EdgeId,
        selected: bool,
    },
}

/// A user-drawn link between two node ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: NodeId,
    #[serde(default)]
    pub source_handle: Option<String>,
    pub target: NodeId,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            source_handle: None,
            target,
            target_handle: None,
        }
    }

    pub fn with_handles(
        mut self,
        source_handle: Option<impl Into<String>>,
        target_handle: Option<impl Into<String>>,
    ) -> Self {
        self.source_handle = source_handle.map(Into::into);
        self.target_handle = target_handle.map(Into::into);
        self
    }
}

/// Minimal delta describing which objects a batch touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<T> {
    pub added: Vec<Id<T>>,
    pub removed: Vec<Id<T>>,
    pub updated: Vec<Id<T>>,
}

impl<T> Default for Delta<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
        }
    }
}

impl<T> Delta<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

include!("ops_impl.rs");

#[cfg(test)]
mod tests;
