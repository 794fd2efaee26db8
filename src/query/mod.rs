// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the process graph.
//!
//! Queries provide derived views (e.g. node lookup for the command palette) without touching
//! the store.

pub mod nodes;
