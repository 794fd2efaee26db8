// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::model::ProcessDocument;
use crate::pipeline::{parse_payload, to_pretty_json, LoadError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid process document {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    #[error("failed to encode process document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A `*.flowchartprocess.json` file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl ProcessFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn read_text(&self) -> Result<String, FileError> {
        fs::read_to_string(&self.path).map_err(|source| FileError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Reads and parses the file. An empty file reads as the empty document.
    pub fn read(&self) -> Result<ProcessDocument, FileError> {
        let text = self.read_text()?;
        let doc = parse_payload(&text).map_err(|source| FileError::Load {
            path: self.path.clone(),
            source,
        })?;
        Ok(doc.unwrap_or_default())
    }

    /// Writes the document with the same two-space formatting the editor pushes to the host.
    pub fn write(&self, doc: &ProcessDocument) -> Result<(), FileError> {
        let text = to_pretty_json(doc)?;
        write_atomic(&self.path, text.as_bytes(), self.durability)?;
        debug!(path = %self.path.display(), bytes = text.len(), "wrote process file");
        Ok(())
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), FileError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| FileError::Io { path, source }
    };

    let Some(file_name) = path.file_name() else {
        return Err(FileError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".procflow.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;

    if let Err(source) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(FileError::Io {
            path: tmp_path,
            source,
        });
    }

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(io_err(&tmp_path))?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(FileError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(io_err(parent))?;
            dir.sync_all().map_err(io_err(parent))?;
        }
    }

    Ok(())
}
