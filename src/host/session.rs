// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use super::messages::{FileKind, InboundMessage, OpenFileRequest, OutboundMessage};
use super::metadata::FileIdentity;
use crate::config::EditorConfig;
use crate::model::{CrossReference, NodeId, NodeType, Position};
use crate::ops::edit::{self, EditError};
use crate::pipeline::{document_from_payload, normalize, serialize_pretty, LoadError};
use crate::store::{ProcessStore, Subscription};
use crate::ui::EditorUiState;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    /// `ready` was sent; no document yet.
    AwaitingDocument,
    /// A document arrived and waits for the load deferral to elapse.
    Loading,
    Pushing,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingDocument => "awaiting-document",
            Self::Loading => "loading",
            Self::Pushing => "pushing",
        };
        f.write_str(name)
    }
}

/// The document half of an `update` message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpdate {
    pub payload: Option<String>,
    pub identity: FileIdentity,
}

impl DocumentUpdate {
    pub fn new(payload: impl Into<String>, identity: FileIdentity) -> Self {
        Self {
            payload: Some(payload.into()),
            identity,
        }
    }
}

/// One editor session bound to one host document.
///
/// Every effective store mutation is serialized and pushed to the host as a `change` message.
/// Sends are fire-and-forget; a closed host channel is logged and otherwise ignored.
pub struct HostSession {
    store: ProcessStore,
    ui: EditorUiState,
    config: EditorConfig,
    outbound: UnboundedSender<OutboundMessage>,
    state: Rc<Cell<SyncState>>,
    pending: Option<DocumentUpdate>,
    push_subscription: Subscription,
}

impl fmt::Debug for HostSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSession")
            .field("store", &self.store)
            .field("ui", &self.ui)
            .field("state", &self.state.get())
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl HostSession {
    pub fn new(config: EditorConfig, outbound: UnboundedSender<OutboundMessage>) -> Self {
        let store = ProcessStore::new(&config.defaults);
        Self::with_store(config, store, outbound)
    }

    pub fn with_store(
        config: EditorConfig,
        mut store: ProcessStore,
        outbound: UnboundedSender<OutboundMessage>,
    ) -> Self {
        let state = Rc::new(Cell::new(SyncState::Idle));
        let push_subscription = {
            let state = Rc::clone(&state);
            let outbound = outbound.clone();
            store.subscribe(move |store: &ProcessStore| push_change(store, &state, &outbound))
        };
        Self {
            store,
            ui: EditorUiState::default(),
            config,
            outbound,
            state,
            pending: None,
            push_subscription,
        }
    }

    pub fn store(&self) -> &ProcessStore {
        &self.store
    }

    /// Mutations made through this handle are pushed to the host.
    pub fn store_mut(&mut self) -> &mut ProcessStore {
        &mut self.store
    }

    pub fn ui(&self) -> &EditorUiState {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut EditorUiState {
        &mut self.ui
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> SyncState {
        self.state.get()
    }

    pub fn has_pending_update(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_subscription(&self) -> Subscription {
        self.push_subscription
    }

    /// Announces the editor to the host.
    pub fn start(&mut self) {
        self.send(OutboundMessage::Ready);
        self.transition(SyncState::AwaitingDocument);
    }

    /// Handles one inbound message synchronously. An `update` loads without deferral.
    pub fn handle_message(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::Update {
                payload,
                file_name,
                relative_path,
                full_file_name,
            } => {
                self.begin_update(DocumentUpdate {
                    payload,
                    identity: FileIdentity {
                        file_name,
                        relative_path,
                        full_file_name,
                    },
                });
                self.finish_update();
            }
            InboundMessage::ExecutionPaused { node_id } => {
                let node_id = node_id.and_then(|id| NodeId::new(id).ok());
                debug!(node_id = ?node_id.as_ref().map(NodeId::as_str), "execution paused");
                self.ui.set_paused_node(node_id);
            }
            InboundMessage::LoadBreakpoints { breakpoints } => {
                debug!(count = breakpoints.len(), "loaded breakpoints");
                self.ui.replace_breakpoints(breakpoints);
            }
        }
    }

    /// Queues a document for loading. A later update replaces one that has not loaded yet.
    pub fn begin_update(&mut self, update: DocumentUpdate) {
        if self.pending.replace(update).is_some() {
            debug!("superseded pending document update");
        }
        self.transition(SyncState::Loading);
    }

    /// Loads the queued document, if any.
    ///
    /// A malformed payload loads the canonical empty document; the parse error is returned for
    /// reporting and never reaches the host channel.
    pub fn finish_update(&mut self) -> Option<LoadError> {
        let update = self.pending.take()?;
        let (mut doc, err) = document_from_payload(update.payload.as_deref().unwrap_or_default());
        update.identity.apply_to(&mut doc, &self.config);
        let loaded = normalize(doc, &self.config.defaults, self.store.ids());
        self.store.load(loaded);
        self.transition(SyncState::Idle);
        err
    }

    /// Drives the protocol until the inbound channel closes.
    ///
    /// An `update` starts the load deferral. Further updates during the deferral replace the
    /// queued one; any other message is handled after the load, in arrival order.
    pub async fn run(&mut self, mut inbound: UnboundedReceiver<InboundMessage>) {
        self.start();
        while let Some(message) = inbound.recv().await {
            if !matches!(message, InboundMessage::Update { .. }) {
                self.handle_message(message);
                continue;
            }
            self.queue_update_message(message);

            let mut deferred = Vec::new();
            let deferral = tokio::time::sleep(self.config.load_deferral());
            tokio::pin!(deferral);
            loop {
                tokio::select! {
                    () = &mut deferral => break,
                    next = inbound.recv() => match next {
                        Some(next @ InboundMessage::Update { .. }) => self.queue_update_message(next),
                        Some(next) => deferred.push(next),
                        None => break,
                    },
                }
            }

            if let Some(err) = self.finish_update() {
                warn!(error = %err, "host sent an unreadable document");
            }
            for message in deferred {
                self.handle_message(message);
            }
        }
        debug!("host channel closed");
    }

    fn queue_update_message(&mut self, message: InboundMessage) {
        if let InboundMessage::Update {
            payload,
            file_name,
            relative_path,
            full_file_name,
        } = message
        {
            self.begin_update(DocumentUpdate {
                payload,
                identity: FileIdentity {
                    file_name,
                    relative_path,
                    full_file_name,
                },
            });
        }
    }

    /// Flips the breakpoint on a node and mirrors it to the host.
    pub fn toggle_breakpoint(&mut self, node_id: &NodeId) -> bool {
        let set = self.ui.toggle_breakpoint(node_id.as_str());
        let node_id = node_id.as_str().to_owned();
        self.send(if set {
            OutboundMessage::SetBreakpoint { node_id }
        } else {
            OutboundMessage::RemoveBreakpoint { node_id }
        });
        set
    }

    /// Asks the host to open whatever the node refers to. Nodes without a reference do nothing.
    pub fn activate_node(&self, node_id: &NodeId) -> Option<OpenFileRequest> {
        let reference = self.store.node(node_id)?.cross_reference()?;
        let request = match reference {
            CrossReference::JavaClass(target) => OpenFileRequest {
                kind: FileKind::Java,
                target,
            },
            CrossReference::Process(target) => OpenFileRequest {
                kind: FileKind::Process,
                target,
            },
        };
        self.send(OutboundMessage::OpenFile {
            payload: request.clone(),
        });
        Some(request)
    }

    /// Places a node from the palette. A refusal is also raised as the editor alert.
    pub fn place_node(
        &mut self,
        node_type: NodeType,
        position: Position,
        label: Option<&str>,
    ) -> Result<NodeId, EditError> {
        edit::place_node(&mut self.store, node_type, position, label)
            .map_err(|err| {
                self.ui.set_alert(err.to_string());
                err
            })
    }

    /// Replaces the document with user-chosen file contents. A refusal is raised as the alert.
    pub fn import_file_text(&mut self, text: &str) -> Result<(), EditError> {
        edit::import_document_text(&mut self.store, text, &self.config.defaults)
            .map_err(|err| {
                self.ui.set_alert(err.to_string());
                err
            })
    }

    /// The document as the host would store it.
    pub fn export(&self) -> Result<String, serde_json::Error> {
        serialize_pretty(&self.store)
    }

    fn send(&self, message: OutboundMessage) {
        send_to_host(&self.outbound, message);
    }

    fn transition(&self, next: SyncState) {
        let previous = self.state.replace(next);
        if previous != next {
            debug!(from = %previous, to = %next, "sync state");
        }
    }
}

fn push_change(
    store: &ProcessStore,
    state: &Cell<SyncState>,
    outbound: &UnboundedSender<OutboundMessage>,
) {
    let resume = state.replace(SyncState::Pushing);
    match serialize_pretty(store) {
        Ok(payload) => send_to_host(outbound, OutboundMessage::Change { payload }),
        Err(err) => error!(error = %err, rev = store.rev(), "failed to serialize process"),
    }
    state.set(match resume {
        SyncState::Loading => SyncState::Loading,
        _ => SyncState::Idle,
    });
}

fn send_to_host(outbound: &UnboundedSender<OutboundMessage>, message: OutboundMessage) {
    if let Err(err) = outbound.send(message) {
        error!(dropped = ?err.0, "host channel closed, dropping message");
    }
}
