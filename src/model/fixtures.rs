// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Value};

use super::document::ProcessDocument;

/// A small order-handling process exercising every node type and both root properties.
pub(crate) fn order_process_json() -> Value {
    json!({
        "id": "process-1700000000000",
        "name": "orders",
        "type": "processNode",
        "filename": "process/orders.flowchartprocess.json",
        "blackboard": {
            "variables": [
                {"id": "order_id", "name": "Order Id", "type": "string", "defaultValue": "", "category": "input"},
                {"id": "total", "name": "Total", "type": "number", "defaultValue": 0, "category": "local"},
                {"id": "approved", "name": "Approved", "type": "boolean", "defaultValue": false, "category": "output"}
            ]
        },
        "nodes": [
            {
                "id": "startNode-1",
                "type": "startNode",
                "position": {"x": 250, "y": 50},
                "data": {"label": "Start"}
            },
            {
                "id": "actionNode-2",
                "type": "actionNode",
                "position": {"x": 250, "y": 150},
                "data": {
                    "label": "Price order",
                    "inputs": {"order": {"variableId": "order_id", "type": "string"}},
                    "outputs": {"sum": {"variableId": "total", "type": "number"}}
                },
                "javaClassName": "com.acme.orders.PriceOrder",
                "width": 180,
                "height": 64
            },
            {
                "id": "calltoProcessNode-3",
                "type": "calltoProcessNode",
                "position": {"x": 250, "y": 250},
                "data": {"label": "Approve"},
                "callToProcess": "approvals"
            },
            {
                "id": "noteNode-4",
                "type": "noteNode",
                "position": {"x": 500, "y": 150},
                "data": {"label": "Note", "note": "Totals are in cents."}
            }
        ],
        "edges": [
            {"id": "e1", "source": "startNode-1", "target": "actionNode-2"},
            {
                "id": "e2",
                "source": "actionNode-2",
                "sourceHandle": "out",
                "target": "calltoProcessNode-3",
                "targetHandle": "in",
                "animated": true
            }
        ],
        "viewport": {"x": 0, "y": 0, "zoom": 1.25}
    })
}

pub(crate) fn order_process() -> ProcessDocument {
    serde_json::from_value(order_process_json()).expect("order process fixture")
}

/// The same process as the host ecosystem writes it: stale render state on edges, a legacy
/// call-node spelling and a variable without a category.
pub(crate) fn legacy_order_process_json() -> Value {
    let mut value = order_process_json();
    value["nodes"][2]["type"] = json!("callProcessNode");
    value["edges"][0]["markerEnd"] = json!({"type": "arrowclosed"});
    value["edges"][1]["style"] = json!({"stroke": "#888", "strokeWidth": 2});
    if let Some(total) = value["blackboard"]["variables"][1].as_object_mut() {
        total.remove("category");
    }
    value
}
