// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::GraphNode;
use regex::RegexBuilder;

/// Results shown by the command palette before anything is typed.
pub const PALETTE_IDLE_LIMIT: usize = 10;
/// Upper bound on command palette matches.
pub const PALETTE_MATCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSearchMode {
    Substring,
    Regex,
}

fn node_matches(node: &GraphNode, pred: impl Fn(&str) -> bool) -> bool {
    node.label().is_some_and(&pred) || pred(node.id().as_str())
}

/// Nodes whose label or id matches `needle`, in document order.
pub fn node_search<'a>(
    nodes: &'a [GraphNode],
    needle: &str,
    mode: NodeSearchMode,
    case_insensitive: bool,
) -> Result<Vec<&'a GraphNode>, regex::Error> {
    match mode {
        NodeSearchMode::Substring => {
            if case_insensitive {
                let needle_lower = needle.to_lowercase();
                Ok(nodes
                    .iter()
                    .filter(|node| {
                        node_matches(node, |text| text.to_lowercase().contains(&needle_lower))
                    })
                    .collect())
            } else {
                Ok(nodes
                    .iter()
                    .filter(|node| node_matches(node, |text| text.contains(needle)))
                    .collect())
            }
        }
        NodeSearchMode::Regex => {
            let regex = RegexBuilder::new(needle)
                .case_insensitive(case_insensitive)
                .build()?;
            Ok(nodes
                .iter()
                .filter(|node| node_matches(node, |text| regex.is_match(text)))
                .collect())
        }
    }
}

/// Command palette lookup: the first few nodes for an empty query, otherwise a
/// case-insensitive substring match on label or id.
pub fn palette_matches<'a>(nodes: &'a [GraphNode], query: &str) -> Vec<&'a GraphNode> {
    if query.is_empty() {
        return nodes.iter().take(PALETTE_IDLE_LIMIT).collect();
    }

    let query = query.to_lowercase();
    nodes
        .iter()
        .filter(|node| node_matches(node, |text| text.to_lowercase().contains(&query)))
        .take(PALETTE_MATCH_LIMIT)
        .collect()
}
