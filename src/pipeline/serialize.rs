// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Blackboard, ProcessDocument};
use crate::store::ProcessStore;

/// Snapshots the store as a process document.
///
/// Nodes are copied whole, so `javaClassName` / `callToProcess` land back on the node root and
/// unknown root fields written by other tools survive. Edges, variables and the viewport are
/// copied verbatim.
pub fn serialize(store: &ProcessStore) -> ProcessDocument {
    let meta = store.meta();
    ProcessDocument {
        id: Some(meta.id.clone()),
        name: Some(meta.name.clone()),
        process_type: Some(meta.process_type.clone()),
        filename: Some(meta.filename.clone()),
        blackboard: Blackboard {
            variables: store.variables().to_vec(),
            extra: store.blackboard_extra().clone(),
        },
        nodes: store.nodes().to_vec(),
        edges: store.edges().to_vec(),
        viewport: store.viewport().cloned(),
        extra: store.extra().clone(),
    }
}

/// Two-space indented JSON, the exact text pushed to the host and shown in the JSON view.
pub fn to_pretty_json(doc: &ProcessDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

pub fn serialize_pretty(store: &ProcessStore) -> Result<String, serde_json::Error> {
    to_pretty_json(&serialize(store))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::{json, Value};

    use super::{serialize, serialize_pretty};
    use crate::config::DocumentDefaults;
    use crate::model::fixtures::{legacy_order_process_json, order_process, order_process_json};
    use crate::model::{NodeDataPatch, NodeId, ProcessDocument};
    use crate::pipeline::normalize;
    use crate::store::ProcessStore;

    #[fixture]
    fn store() -> ProcessStore {
        ProcessStore::new(&DocumentDefaults::default())
    }

    fn load(store: &mut ProcessStore, doc: ProcessDocument) {
        let loaded = normalize(doc, &DocumentDefaults::default(), store.ids());
        store.load(loaded);
    }

    #[rstest]
    fn well_formed_document_round_trips(mut store: ProcessStore) {
        load(&mut store, order_process());
        let output = serde_json::to_value(serialize(&store)).expect("serialize");
        assert_eq!(output, order_process_json());
    }

    #[rstest]
    fn legacy_document_round_trips_modulo_render_state(mut store: ProcessStore) {
        let input = legacy_order_process_json();
        let doc: ProcessDocument = serde_json::from_value(input.clone()).expect("document");
        load(&mut store, doc);

        let mut expected = input;
        for edge in expected["edges"].as_array_mut().expect("edges") {
            let edge = edge.as_object_mut().expect("edge object");
            edge.remove("markerEnd");
            edge.remove("style");
        }
        let total = expected["blackboard"]["variables"][1]
            .as_object_mut()
            .expect("variable object");
        total.insert("category".to_owned(), json!("local"));

        let output = serde_json::to_value(serialize(&store)).expect("serialize");
        assert_eq!(output, expected);
        assert_eq!(output["nodes"][2]["type"], "callProcessNode");
    }

    #[rstest]
    fn data_update_keeps_call_target_at_root(mut store: ProcessStore) {
        load(&mut store, order_process());
        let call_id = NodeId::new("calltoProcessNode-3").expect("node id");
        assert!(store.update_node(
            &call_id,
            NodeDataPatch {
                label: Some("x".to_owned()),
                ..NodeDataPatch::default()
            }
        ));

        let output = serde_json::to_value(serialize(&store)).expect("serialize");
        let node = &output["nodes"][2];
        assert_eq!(node["callToProcess"], "approvals");
        assert_eq!(node["data"]["label"], "x");
        assert_eq!(node["data"].get("callToProcess"), None::<&Value>);
    }

    #[rstest]
    fn pretty_output_uses_two_space_indent(store: ProcessStore) {
        let text = serialize_pretty(&store).expect("pretty json");
        assert!(text.starts_with("{\n  \"id\": \"process-"));
        assert!(text.contains("\n  \"blackboard\": {\n    \"variables\": []\n  }"));
    }
}
