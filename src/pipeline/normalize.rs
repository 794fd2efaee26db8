// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::DocumentDefaults;
use crate::model::{GraphEdge, GraphNode, IdGenerator, ProcessDocument, Variable};
use crate::store::ProcessMeta;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("document is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("document root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("document does not match the process schema: {0}")]
    Schema(#[source] serde_json::Error),
}

/// A document in canonical store shape, ready to replace the store contents in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProcess {
    pub meta: ProcessMeta,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub variables: Vec<Variable>,
    pub viewport: Option<Value>,
    pub blackboard_extra: Map<String, Value>,
    pub extra: Map<String, Value>,
}

/// Parses raw document text.
///
/// Blank text and a literal `null` carry no document and yield `Ok(None)`.
pub fn parse_payload(text: &str) -> Result<Option<ProcessDocument>, LoadError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text).map_err(LoadError::Syntax)?;
    let found = match &value {
        Value::Null => return Ok(None),
        Value::Object(_) => None,
        Value::Bool(_) => Some("a boolean"),
        Value::Number(_) => Some("a number"),
        Value::String(_) => Some("a string"),
        Value::Array(_) => Some("an array"),
    };
    if let Some(found) = found {
        return Err(LoadError::NotAnObject { found });
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(LoadError::Schema)
}

/// Like [`parse_payload`], but never fails: anything unusable becomes the canonical empty
/// document and the error is handed back for reporting.
pub fn document_from_payload(text: &str) -> (ProcessDocument, Option<LoadError>) {
    match parse_payload(text) {
        Ok(Some(doc)) => (doc, None),
        Ok(None) => (ProcessDocument::empty(), None),
        Err(err) => {
            warn!(error = %err, "malformed process document, falling back to empty document");
            (ProcessDocument::empty(), Some(err))
        }
    }
}

/// Brings a parsed document into canonical store shape.
///
/// Edge render state is dropped, blank metadata falls back to `defaults`, a missing id is
/// minted from `ids`. Variables that share an id are all kept; only edits refuse duplicates.
pub fn normalize(
    doc: ProcessDocument,
    defaults: &DocumentDefaults,
    ids: &IdGenerator,
) -> LoadedProcess {
    let ProcessDocument {
        id,
        name,
        process_type,
        filename,
        blackboard,
        nodes,
        mut edges,
        viewport,
        extra,
    } = doc;

    let stripped = edges
        .iter_mut()
        .map(GraphEdge::strip_render_state)
        .filter(|stripped| *stripped)
        .count();
    if stripped > 0 {
        debug!(edges = stripped, "stripped edge render state");
    }

    let meta = ProcessMeta {
        id: id.unwrap_or_else(|| ids.process_id()),
        name: non_empty_or(name, &defaults.name),
        filename: non_empty_or(filename, &defaults.filename),
        process_type: non_empty_or(process_type, &defaults.process_type),
    };

    let mut seen = HashSet::new();
    for variable in &blackboard.variables {
        if !seen.insert(&variable.id) {
            warn!(variable_id = %variable.id, "document repeats a variable id");
        }
    }

    LoadedProcess {
        meta,
        nodes,
        edges,
        variables: blackboard.variables,
        viewport,
        blackboard_extra: blackboard.extra,
        extra,
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}
