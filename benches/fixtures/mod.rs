// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic generated flowcharts (no RNG): a start node followed by a chain of call
// nodes laid out on a grid, each bound to one input and one output variable.

use serde_json::{json, Value};

use procflow::config::DocumentDefaults;
use procflow::model::IdGenerator;
use procflow::pipeline::{normalize, parse_payload};
use procflow::store::ProcessStore;

const EPOCH: u64 = 1_700_000_000_000;
const COLUMNS: usize = 10;
const X_SPACING: usize = 300;
const Y_SPACING: usize = 250;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 200 call nodes, 60 variables.
    Small,
    /// 1000 call nodes, 50 variables.
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }

    fn shape(self) -> (usize, usize) {
        match self {
            Self::Small => (200, 60),
            Self::Large => (1000, 50),
        }
    }

    pub fn node_count(self) -> u64 {
        self.shape().0 as u64 + 1
    }
}

fn category(idx: usize) -> &'static str {
    match idx % 3 {
        0 => "input",
        1 => "output",
        _ => "local",
    }
}

pub fn flowchart(case: Case) -> Value {
    let (call_nodes, var_count) = case.shape();

    let variables = (1..=var_count)
        .map(|idx| {
            json!({
                "id": format!("var{idx}"),
                "name": format!("Variable_{idx}"),
                "type": "string",
                "defaultValue": format!("default_val_{idx}"),
                "category": category(idx),
            })
        })
        .collect::<Vec<_>>();

    let start_id = format!("startNode-{EPOCH}");
    let mut nodes = vec![json!({
        "id": start_id,
        "type": "startNode",
        "position": {"x": 0, "y": 0},
        "data": {"label": "Start"},
        "width": 100,
        "height": 40,
        "selected": false,
        "positionAbsolute": {"x": 0, "y": 0},
        "dragging": false,
    })];
    let mut edges = Vec::with_capacity(call_nodes);

    let mut previous = start_id;
    for idx in 0..call_nodes {
        let id = format!("calltoProcessNode-{EPOCH}-{idx}");
        let x = (idx % COLUMNS) * X_SPACING;
        let y = (idx / COLUMNS + 1) * Y_SPACING;
        let input = format!("var{}", idx % var_count + 1);
        let output = format!("var{}", (idx * 7) % var_count + 1);

        nodes.push(json!({
            "id": id,
            "type": "calltoProcessNode",
            "position": {"x": x, "y": y},
            "data": {
                "label": format!("Action {}", idx + 1),
                "inputs": {format!("In_{input}"): {"variableId": input, "type": "string"}},
                "outputs": {format!("Out_{output}"): {"variableId": output, "type": "string"}},
            },
            "callToProcess": format!("sub_process_{}", idx % 25),
            "width": 200,
            "height": 200,
            "selected": false,
            "positionAbsolute": {"x": x, "y": y},
            "dragging": false,
        }));
        edges.push(json!({
            "source": previous,
            "sourceHandle": "exec-out",
            "target": id,
            "targetHandle": "exec-in",
            "id": format!("edge-{idx}"),
            "markerEnd": {"type": "arrowclosed"},
        }));
        previous = id;
    }

    json!({
        "id": format!("process-{EPOCH}"),
        "name": format!("Large Process ({call_nodes} nodes)"),
        "blackboard": {"variables": variables},
        "nodes": nodes,
        "edges": edges,
    })
}

pub fn flowchart_text(case: Case) -> String {
    serde_json::to_string_pretty(&flowchart(case)).expect("fixture json")
}

pub fn loaded_store(case: Case) -> ProcessStore {
    let defaults = DocumentDefaults::default();
    let mut store = ProcessStore::with_ids(&defaults, IdGenerator::with_epoch(EPOCH as u128));
    let doc = parse_payload(&flowchart_text(case))
        .expect("fixture parses")
        .expect("fixture document");
    let loaded = normalize(doc, &defaults, store.ids());
    store.load(loaded);
    store
}

pub fn checksum_store(store: &ProcessStore) -> u64 {
    let ports = store
        .nodes()
        .iter()
        .map(|node| {
            let data = node.data();
            data.inputs.as_ref().map_or(0, |ports| ports.len())
                + data.outputs.as_ref().map_or(0, |ports| ports.len())
        })
        .sum::<usize>();
    (store.nodes().len() + store.edges().len() + store.variables().len() + ports) as u64
}
