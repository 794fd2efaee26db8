// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor-only state that never reaches the process document.
//!
//! Changes here bump their own revision and never trigger a push to the host.

use std::collections::BTreeSet;

use crate::model::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorUiState {
    rev: u64,
    editing_node_id: Option<NodeId>,
    paused_node_id: Option<NodeId>,
    alert: Option<String>,
    breakpoints: BTreeSet<String>,
}

impl EditorUiState {
    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// The node open in the property panel.
    pub fn editing_node_id(&self) -> Option<&NodeId> {
        self.editing_node_id.as_ref()
    }

    pub fn paused_node_id(&self) -> Option<&NodeId> {
        self.paused_node_id.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn breakpoints(&self) -> &BTreeSet<String> {
        &self.breakpoints
    }

    pub fn has_breakpoint(&self, node_id: &str) -> bool {
        self.breakpoints.contains(node_id)
    }

    pub fn set_editing_node(&mut self, node_id: Option<NodeId>) {
        if self.editing_node_id == node_id {
            return;
        }
        self.editing_node_id = node_id;
        self.bump();
    }

    pub fn set_paused_node(&mut self, node_id: Option<NodeId>) {
        if self.paused_node_id == node_id {
            return;
        }
        self.paused_node_id = node_id;
        self.bump();
    }

    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
        self.bump();
    }

    pub fn take_alert(&mut self) -> Option<String> {
        let alert = self.alert.take();
        if alert.is_some() {
            self.bump();
        }
        alert
    }

    pub fn replace_breakpoints<I>(&mut self, breakpoints: I)
    where
        I: IntoIterator<Item = String>,
    {
        let breakpoints = breakpoints.into_iter().collect::<BTreeSet<_>>();
        if self.breakpoints == breakpoints {
            return;
        }
        self.breakpoints = breakpoints;
        self.bump();
    }

    /// Flips the breakpoint on `node_id`; returns `true` if it is now set.
    pub fn toggle_breakpoint(&mut self, node_id: &str) -> bool {
        let set = if self.breakpoints.remove(node_id) {
            false
        } else {
            self.breakpoints.insert(node_id.to_owned());
            true
        };
        self.bump();
        set
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::EditorUiState;
    use crate::model::NodeId;

    #[test]
    fn toggle_breakpoint_flips_membership() {
        let mut ui = EditorUiState::default();
        assert!(ui.toggle_breakpoint("actionNode-1"));
        assert!(ui.has_breakpoint("actionNode-1"));
        assert!(!ui.toggle_breakpoint("actionNode-1"));
        assert!(ui.breakpoints().is_empty());
        assert_eq!(ui.rev(), 2);
    }

    #[test]
    fn replace_breakpoints_is_idempotent() {
        let mut ui = EditorUiState::default();
        ui.replace_breakpoints(vec!["b".to_owned(), "a".to_owned(), "a".to_owned()]);
        assert_eq!(ui.rev(), 1);
        ui.replace_breakpoints(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(ui.rev(), 1);
        assert_eq!(
            ui.breakpoints().iter().cloned().collect::<Vec<_>>(),
            vec!["a".to_owned(), "b".to_owned()]
        );
    }

    #[test]
    fn alert_is_taken_once() {
        let mut ui = EditorUiState::default();
        ui.set_alert("Process can have only one start node.");
        assert_eq!(ui.alert(), Some("Process can have only one start node."));
        assert_eq!(
            ui.take_alert().as_deref(),
            Some("Process can have only one start node.")
        );
        assert_eq!(ui.take_alert(), None);
    }

    #[test]
    fn paused_node_only_bumps_on_change() {
        let mut ui = EditorUiState::default();
        let node = NodeId::new("actionNode-2").expect("node id");
        ui.set_paused_node(Some(node.clone()));
        ui.set_paused_node(Some(node.clone()));
        assert_eq!(ui.paused_node_id(), Some(&node));
        assert_eq!(ui.rev(), 1);
    }
}
