// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Directory listings for mounted volumes.

use std::{fs, io, path::Path};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child of a browsed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    pub modified: DateTime<Utc>,
    /// Byte size, files only.
    pub size: Option<u64>,
}

/// List the immediate children of `directory`.
///
/// Symbolic links are reported as whatever they point to. Entries that are
/// neither files nor directories (sockets, fifos, dangling links) and names
/// that are not valid UTF-8 are skipped. Order is whatever the filesystem
/// returns.
pub fn list_directory(directory: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let Ok(metadata) = fs::metadata(entry.path()) else {
            continue;
        };

        let kind = if metadata.is_file() {
            EntryKind::File
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else {
            continue;
        };

        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        entries.push(DirectoryEntry {
            name,
            kind,
            modified,
            size: (kind == EntryKind::File).then(|| metadata.len()),
        });
    }

    Ok(entries)
}
