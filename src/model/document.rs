// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::{lenient_default, lenient_items, optional_id, optional_string, present};
use super::edge::GraphEdge;
use super::ids::ProcessId;
use super::node::GraphNode;
use super::variable::Variable;

/// The persisted process document (`*.flowchartprocess.json`).
///
/// Only `nodes`, `edges` and `blackboard` are structural; every other key is optional so that
/// partial and legacy documents still load. A list entry that cannot be read is skipped rather
/// than failing the document. Keys this type does not know about are kept in `extra` and
/// written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessDocument {
    #[serde(
        default,
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ProcessId>,
    #[serde(
        default,
        deserialize_with = "optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub process_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient_default")]
    pub blackboard: Blackboard,
    #[serde(default, deserialize_with = "lenient_items")]
    pub nodes: Vec<GraphNode>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub edges: Vec<GraphEdge>,
    /// Camera state, kept verbatim and never interpreted.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub viewport: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessDocument {
    /// `{ nodes: [], edges: [], blackboard: { variables: [] } }`
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Blackboard {
    #[serde(default, deserialize_with = "lenient_items")]
    pub variables: Vec<Variable>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The JSON schema of [`ProcessDocument`].
pub fn document_schema() -> Schema {
    schemars::schema_for!(ProcessDocument)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{document_schema, ProcessDocument};

    #[test]
    fn structural_nulls_read_as_empty() {
        let doc: ProcessDocument = serde_json::from_value(json!({
            "id": "",
            "nodes": null,
            "edges": null,
            "blackboard": null,
            "viewport": null
        }))
        .expect("document");

        assert!(doc.id.is_none());
        assert!(doc.nodes.is_empty());
        assert!(doc.edges.is_empty());
        assert!(doc.blackboard.variables.is_empty());
        assert_eq!(doc.viewport, Some(Value::Null));
    }

    #[test]
    fn empty_document_serializes_to_canonical_shell() {
        let value = serde_json::to_value(ProcessDocument::empty()).expect("serialize");
        assert_eq!(
            value,
            json!({"blackboard": {"variables": []}, "nodes": [], "edges": []})
        );
    }

    #[test]
    fn top_level_order_matches_the_file_format() {
        let doc: ProcessDocument = serde_json::from_value(json!({
            "edges": [],
            "nodes": [],
            "filename": "p.flowchartprocess.json",
            "name": "P",
            "id": "process-1",
            "type": "processNode",
            "blackboard": {"variables": []},
            "owner": "team-a"
        }))
        .expect("document");

        let text = serde_json::to_string(&doc).expect("serialize");
        assert_eq!(
            text,
            r#"{"id":"process-1","name":"P","type":"processNode","filename":"p.flowchartprocess.json","blackboard":{"variables":[]},"nodes":[],"edges":[],"owner":"team-a"}"#
        );
    }

    #[test]
    fn partial_viewport_and_odd_metadata_survive() {
        let input = json!({
            "id": "process-1",
            "name": 42,
            "blackboard": "none",
            "nodes": [
                {"id": "a", "type": "startNode", "data": {"label": "Start"}},
                {"type": "noteNode"},
                {"id": "b", "type": "noteNode", "data": {"label": 5}}
            ],
            "edges": {"not": "a list"},
            "viewport": {"x": 0, "y": 0}
        });
        let doc: ProcessDocument = serde_json::from_value(input).expect("document");

        assert_eq!(doc.name, None);
        assert!(doc.blackboard.variables.is_empty());
        assert_eq!(doc.nodes.len(), 2);
        assert!(doc.edges.is_empty());

        let output = serde_json::to_value(&doc).expect("serialize");
        assert_eq!(output["viewport"], json!({"x": 0, "y": 0}));
        assert_eq!(output["nodes"][1]["data"], json!({"label": 5}));
    }

    #[test]
    fn schema_names_the_root_properties() {
        let schema = serde_json::to_value(document_schema()).expect("schema");
        let text = schema.to_string();
        assert!(text.contains("javaClassName"));
        assert!(text.contains("callToProcess"));
        assert!(text.contains("blackboard"));
    }
}
