// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Host synchronization: the message contract with the surrounding editor and the session
//! that keeps the store and the host document in step.
//!
//! The protocol is push-only. The host sends whole documents; the editor answers every effective
//! mutation with the whole serialized document. Nothing is acknowledged.

pub mod messages;
pub mod metadata;
pub mod session;

pub use messages::{
    message_schemas, parse_pause_marker, FileKind, InboundMessage, OpenFileRequest,
    OutboundMessage, RuntimeCommand, RuntimeEvent,
};
pub use metadata::FileIdentity;
pub use session::{DocumentUpdate, HostSession, SyncState};
