// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types for the volume lifecycle.

use std::{io, path::PathBuf, time::Duration};

/// Failure while talking to the external encryption tool.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("{operation} did not finish within {}s", .timeout.as_secs_f32())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("{operation} exited with status {}", describe_exit(.code))]
    Failed {
        operation: &'static str,
        code: Option<i32>,
    },

    #[error("I/O error while running {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("malformed list line {line:?}: {reason}")]
    MalformedListLine { line: String, reason: String },
}

impl EngineError {
    /// True when the tool ran to completion and reported failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, EngineError::Failed { .. })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Failure while mounting a volume into a fresh session directory.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    /// The engine refused the mount (wrong password, corrupt container, ...).
    #[error("mount rejected by encryption engine")]
    Rejected(#[source] EngineError),

    /// The engine could not be driven at all (spawn failure, timeout, bad output).
    #[error("encryption engine failure: {0}")]
    Engine(#[source] EngineError),

    /// The temporary mount directory could not be created.
    #[error("failed to create mount directory under {root}: {source}")]
    MountDirectory {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<EngineError> for MountError {
    fn from(error: EngineError) -> Self {
        if error.is_rejection() {
            MountError::Rejected(error)
        } else {
            MountError::Engine(error)
        }
    }
}

/// Failure while building the registry.
#[derive(Debug, thiserror::Error)]
#[error("failed to read volumes directory {path}: {source}")]
pub struct RegistryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub type EngineResult<T> = Result<T, EngineError>;
