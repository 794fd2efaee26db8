// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Component, Path};

use crate::config::EditorConfig;
use crate::model::ProcessDocument;

/// How the host identifies the file behind an `update`.
///
/// File identity wins over whatever `name`/`filename` the document text carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIdentity {
    /// Display name, e.g. `orders`.
    pub file_name: Option<String>,
    /// Workspace-relative path with `/` separators.
    pub relative_path: Option<String>,
    /// Base name including extensions, e.g. `orders.flowchartprocess.json`.
    pub full_file_name: Option<String>,
}

impl FileIdentity {
    /// Derives the identity the host would send for `path`.
    ///
    /// Without a workspace root (or when `path` lies outside it) there is no relative path.
    pub fn from_path(path: &Path, workspace_root: Option<&Path>, config: &EditorConfig) -> Self {
        let full_file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        let file_name = full_file_name.as_deref().map(|full| {
            let stripped = config.strip_file_extension(full);
            if stripped.len() != full.len() {
                stripped.to_owned()
            } else {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| full.to_owned())
            }
        });

        let relative_path = workspace_root
            .and_then(|root| path.strip_prefix(root).ok())
            .map(|relative| {
                relative
                    .components()
                    .filter_map(|component| match component {
                        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .filter(|relative| !relative.is_empty());

        Self {
            file_name,
            relative_path,
            full_file_name,
        }
    }

    /// Writes the identity-derived `name` and `filename` into a parsed document.
    pub fn apply_to(&self, doc: &mut ProcessDocument, config: &EditorConfig) {
        let file_name = non_blank(self.file_name.as_deref());
        let relative_path = non_blank(self.relative_path.as_deref());
        let full_file_name = non_blank(self.full_file_name.as_deref());

        if let Some(file_name) = file_name {
            doc.name = Some(file_name.to_owned());
        } else if let Some(relative_path) = relative_path {
            let last = relative_path.rsplit('/').next().unwrap_or(relative_path);
            doc.name = Some(config.strip_file_extension(last).to_owned());
        }

        if let Some(relative_path) = relative_path {
            doc.filename = Some(config.strip_resource_root(relative_path).to_owned());
        } else if let Some(full_file_name) = full_file_name {
            doc.filename = Some(full_file_name.to_owned());
        }

        let placeholder = match doc.name.as_deref() {
            None | Some("") => true,
            Some(name) => name == config.defaults.name,
        };
        if placeholder {
            if let Some(full_file_name) = full_file_name {
                doc.name = Some(full_file_name.to_owned());
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
