// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire types exchanged with the host and with the debug runtime.
//!
//! Host messages are JSON objects discriminated by `type`; runtime messages by `action`.

use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};

/// Host -> editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    /// The host document changed (or was opened). `payload` is the raw document text.
    #[serde(rename_all = "camelCase")]
    Update {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relative_path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        full_file_name: Option<String>,
    },
    /// The debug runtime stopped at a node. A missing id clears the highlight.
    #[serde(rename_all = "camelCase")]
    ExecutionPaused {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        node_id: Option<String>,
    },
    LoadBreakpoints {
        #[serde(default)]
        breakpoints: Vec<String>,
    },
}

/// Editor -> host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    Ready,
    /// The whole document, pretty-printed.
    Change { payload: String },
    #[serde(rename_all = "camelCase")]
    SetBreakpoint { node_id: String },
    #[serde(rename_all = "camelCase")]
    RemoveBreakpoint { node_id: String },
    OpenFile { payload: OpenFileRequest },
}

/// Asks the host to locate and open the file a node refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OpenFileRequest {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Java,
    Process,
}

impl OpenFileRequest {
    /// The workspace glob the host searches: `**/{SimpleName}.java` for a fully qualified
    /// class, `**/{target}.flowchartprocess.json` for a process.
    pub fn search_glob(&self) -> String {
        match self.kind {
            FileKind::Java => {
                let simple = self.target.rsplit('.').next().unwrap_or(&self.target);
                format!("**/{simple}.java")
            }
            FileKind::Process => format!("**/{}.flowchartprocess.json", self.target),
        }
    }

    pub fn not_found_message(&self) -> String {
        format!("Could not find file for {}", self.target)
    }
}

/// Debug adapter -> runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuntimeCommand {
    Resume,
    Step,
}

/// Runtime -> debug adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action")]
pub enum RuntimeEvent {
    #[serde(rename = "highLightBreakpoint")]
    HighlightBreakpoint,
}

const PAUSE_MARKER: &str = "@@FLOW:PAUSED:";

/// Extracts the node id from a runtime stdout line `@@FLOW:PAUSED:{nodeId}:{details}`.
pub fn parse_pause_marker(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(PAUSE_MARKER)?;
    let node_id = rest.split(':').next().unwrap_or_default();
    (!node_id.is_empty()).then_some(node_id)
}

/// The JSON schemas of the host message envelopes, keyed by direction.
pub fn message_schemas() -> Vec<(&'static str, Schema)> {
    vec![
        ("inbound", schemars::schema_for!(InboundMessage)),
        ("outbound", schemars::schema_for!(OutboundMessage)),
        ("runtimeCommand", schemars::schema_for!(RuntimeCommand)),
        ("runtimeEvent", schemars::schema_for!(RuntimeEvent)),
    ]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{
        message_schemas, parse_pause_marker, FileKind, InboundMessage, OpenFileRequest,
        OutboundMessage, RuntimeCommand, RuntimeEvent,
    };

    #[test]
    fn update_reads_host_field_names() {
        let message: InboundMessage = serde_json::from_value(json!({
            "type": "update",
            "payload": "{}",
            "fileName": "orders",
            "relativePath": "src/main/resources/process/orders.flowchartprocess.json",
            "fullFileName": "orders.flowchartprocess.json"
        }))
        .expect("message");

        assert_eq!(
            message,
            InboundMessage::Update {
                payload: Some("{}".to_owned()),
                file_name: Some("orders".to_owned()),
                relative_path: Some(
                    "src/main/resources/process/orders.flowchartprocess.json".to_owned()
                ),
                full_file_name: Some("orders.flowchartprocess.json".to_owned()),
            }
        );
    }

    #[test]
    fn sparse_inbound_messages_parse() {
        let update: InboundMessage =
            serde_json::from_value(json!({"type": "update"})).expect("update");
        assert!(matches!(update, InboundMessage::Update { payload: None, .. }));

        let breakpoints: InboundMessage =
            serde_json::from_value(json!({"type": "loadBreakpoints"})).expect("breakpoints");
        assert_eq!(
            breakpoints,
            InboundMessage::LoadBreakpoints {
                breakpoints: Vec::new()
            }
        );

        let paused: InboundMessage =
            serde_json::from_value(json!({"type": "executionPaused", "nodeId": "actionNode-2"}))
                .expect("paused");
        assert_eq!(
            paused,
            InboundMessage::ExecutionPaused {
                node_id: Some("actionNode-2".to_owned())
            }
        );
    }

    #[rstest]
    #[case(OutboundMessage::Ready, json!({"type": "ready"}))]
    #[case(
        OutboundMessage::Change { payload: "{}".to_owned() },
        json!({"type": "change", "payload": "{}"})
    )]
    #[case(
        OutboundMessage::SetBreakpoint { node_id: "n1".to_owned() },
        json!({"type": "setBreakpoint", "nodeId": "n1"})
    )]
    #[case(
        OutboundMessage::RemoveBreakpoint { node_id: "n1".to_owned() },
        json!({"type": "removeBreakpoint", "nodeId": "n1"})
    )]
    #[case(
        OutboundMessage::OpenFile {
            payload: OpenFileRequest { kind: FileKind::Java, target: "com.acme.Price".to_owned() }
        },
        json!({"type": "openFile", "payload": {"type": "java", "target": "com.acme.Price"}})
    )]
    fn outbound_wire_shape(#[case] message: OutboundMessage, #[case] expected: serde_json::Value) {
        assert_eq!(serde_json::to_value(&message).expect("serialize"), expected);
    }

    #[test]
    fn open_file_search_globs() {
        let java = OpenFileRequest {
            kind: FileKind::Java,
            target: "com.acme.orders.PriceOrder".to_owned(),
        };
        assert_eq!(java.search_glob(), "**/PriceOrder.java");
        assert_eq!(
            java.not_found_message(),
            "Could not find file for com.acme.orders.PriceOrder"
        );

        let process = OpenFileRequest {
            kind: FileKind::Process,
            target: "approvals".to_owned(),
        };
        assert_eq!(process.search_glob(), "**/approvals.flowchartprocess.json");
    }

    #[test]
    fn runtime_messages_use_action_tag() {
        assert_eq!(
            serde_json::to_value(RuntimeCommand::Resume).expect("serialize"),
            json!({"action": "resume"})
        );
        assert_eq!(
            serde_json::to_value(RuntimeCommand::Step).expect("serialize"),
            json!({"action": "step"})
        );
        let event: RuntimeEvent =
            serde_json::from_value(json!({"action": "highLightBreakpoint"})).expect("event");
        assert_eq!(event, RuntimeEvent::HighlightBreakpoint);
    }

    #[rstest]
    #[case("@@FLOW:PAUSED:actionNode-2:{\"vars\":{}}\n", Some("actionNode-2"))]
    #[case("  @@FLOW:PAUSED:n1", Some("n1"))]
    #[case("@@FLOW:PAUSED::{}", None)]
    #[case("plain output", None)]
    fn pause_marker(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_pause_marker(line), expected);
    }

    #[test]
    fn schemas_cover_every_envelope() {
        let schemas = message_schemas();
        assert_eq!(schemas.len(), 4);
        let inbound = serde_json::to_value(&schemas[0].1).expect("schema").to_string();
        assert!(inbound.contains("relativePath"));
        assert!(inbound.contains("loadBreakpoints"));
    }
}
