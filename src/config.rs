// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor configuration.
//!
//! Every field has a built-in default, so an absent or partial TOML file is valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_PROCESS_NAME: &str = "My Process";
pub const DEFAULT_PROCESS_FILENAME: &str = "process.flowchartprocess.json";
pub const DEFAULT_PROCESS_TYPE: &str = "processNode";
pub const PROCESS_FILE_EXTENSION: &str = ".flowchartprocess.json";

/// Placeholders used for document metadata that is absent (or blank) on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentDefaults {
    pub name: String,
    pub filename: String,
    pub process_type: String,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROCESS_NAME.to_owned(),
            filename: DEFAULT_PROCESS_FILENAME.to_owned(),
            process_type: DEFAULT_PROCESS_TYPE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub defaults: DocumentDefaults,
    /// Host-relative prefixes stripped when deriving a document's `filename`.
    pub resource_roots: Vec<String>,
    pub file_extension: String,
    /// Pause between receiving a document and normalizing it, so a loading indicator can paint.
    pub load_deferral_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            defaults: DocumentDefaults::default(),
            resource_roots: vec![
                "src/main/resources/".to_owned(),
                "src/test/resources/".to_owned(),
            ],
            file_extension: PROCESS_FILE_EXTENSION.to_owned(),
            load_deferral_ms: 100,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    pub fn load_deferral(&self) -> Duration {
        Duration::from_millis(self.load_deferral_ms)
    }

    /// Strips the first matching resource root from a host-relative path.
    pub fn strip_resource_root<'a>(&self, relative_path: &'a str) -> &'a str {
        self.resource_roots
            .iter()
            .find_map(|root| relative_path.strip_prefix(root.as_str()))
            .unwrap_or(relative_path)
    }

    /// `orders.flowchartprocess.json` -> `orders`.
    pub fn strip_file_extension<'a>(&self, file_name: &'a str) -> &'a str {
        file_name
            .strip_suffix(self.file_extension.as_str())
            .unwrap_or(file_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
