// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Procflow: the document core of a visual process-flowchart editor.
//!
//! `*.flowchartprocess.json` documents are parsed into typed entities, normalized into a
//! [`store::ProcessStore`], edited through [`ops`], serialized back without losing unknown
//! fields, and kept in sync with a host editor over the message protocol in [`host`].

pub mod config;
pub mod host;
pub mod model;
pub mod ops;
pub mod pipeline;
pub mod query;
pub mod store;
pub mod ui;
