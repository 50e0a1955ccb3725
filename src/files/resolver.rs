// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mapping of caller-supplied paths onto a mounted volume.
//!
//! Every browse request goes through [`resolve`]. The candidate path must
//! stay inside the mount root both lexically (so `..` traversal to paths
//! that do not exist is still rejected) and after canonicalization (so
//! symbolic links cannot point outside). Containment is checked per path
//! component: a root of `/mnt/foo` does not contain `/mnt/foo-evil`.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

/// A validated path inside the mount root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    File(PathBuf),
    Directory(PathBuf),
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        match self {
            ResolvedPath::File(path) | ResolvedPath::Directory(path) => path,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("path escapes the mount root: {0}")]
    Escapes(String),

    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("mount root is not accessible: {0}")]
    Root(#[source] io::Error),

    #[error("I/O error resolving {requested}: {source}")]
    Io {
        requested: String,
        #[source]
        source: io::Error,
    },
}

/// Resolve `relative` against `mount_root`.
pub fn resolve(mount_root: &Path, relative: &str) -> Result<ResolvedPath, ResolveError> {
    let trimmed = relative.trim_matches(std::path::is_separator);
    let root = fs::canonicalize(mount_root).map_err(ResolveError::Root)?;
    let candidate = root.join(trimmed);

    if !normalize_lexically(&candidate).starts_with(&root) {
        return Err(ResolveError::Escapes(relative.to_string()));
    }

    let canonical = fs::canonicalize(&candidate).map_err(|source| classify(relative, source))?;
    if !canonical.starts_with(&root) {
        return Err(ResolveError::Escapes(relative.to_string()));
    }

    let metadata = fs::metadata(&canonical).map_err(|source| classify(relative, source))?;
    if metadata.is_file() {
        Ok(ResolvedPath::File(canonical))
    } else if metadata.is_dir() {
        Ok(ResolvedPath::Directory(canonical))
    } else {
        Err(ResolveError::NotFound(relative.to_string()))
    }
}

fn classify(relative: &str, source: io::Error) -> ResolveError {
    match source.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::InvalidInput => {
            ResolveError::NotFound(relative.to_string())
        }
        _ => ResolveError::Io {
            requested: relative.to_string(),
            source,
        },
    }
}

/// Collapse `.` and `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
