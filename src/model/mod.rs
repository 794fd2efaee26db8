// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Process document schema and entity types.
//!
//! A document owns a blackboard of typed variables plus the node/edge graph. Nodes keep their
//! type-specific root properties apart from the nested `data` bag.

pub(crate) mod de;
pub mod document;
pub mod edge;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod variable;

pub use document::{document_schema, Blackboard, ProcessDocument};
pub use edge::GraphEdge;
pub use ids::{
    EdgeId, EdgeIdTag, Id, IdError, IdGenerator, NodeId, NodeIdTag, ProcessId, VariableId,
    VariableIdTag,
};
pub use node::{
    CrossReference, GraphNode, NodeData, NodeDataPatch, NodeKind, NodeRootPatch, NodeType,
    PortBinding, PortMap, Position,
};
pub use variable::{
    variable_id_from_name, Variable, VariableCategory, VariablePatch, VariableType,
};
