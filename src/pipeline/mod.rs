// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversion between document text and store state.
//!
//! Loading tolerates partial and legacy documents; serializing writes the canonical shape.

pub mod normalize;
pub mod serialize;

pub use normalize::{
    document_from_payload, normalize, parse_payload, LoadError, LoadedProcess,
};
pub use serialize::{serialize, serialize_pretty, to_pretty_json};
