// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory engine for tests.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use super::{
    engine::{MountRequest, VolumeEngine},
    error::{EngineError, EngineResult},
    list::ListEntry,
};

/// Contents of the file the fake "decrypts" into every mount.
pub const SAMPLE_FILE_NAME: &str = "bar.txt";
pub const SAMPLE_FILE_CONTENTS: &[u8] = b"hello world";

/// Accepts one password and keeps its mount table in memory.
///
/// A successful mount writes [`SAMPLE_FILE_NAME`] into the mount directory,
/// a dismount empties it again, mimicking what a real engine exposes.
pub struct FakeEngine {
    password: String,
    mounts: Mutex<Vec<(PathBuf, PathBuf)>>,
    fail_unmounts: AtomicBool,
    mount_calls: AtomicUsize,
}

impl FakeEngine {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            mounts: Mutex::new(Vec::new()),
            fail_unmounts: AtomicBool::new(false),
            mount_calls: AtomicUsize::new(0),
        }
    }

    pub fn insert_mount(&self, container: impl Into<PathBuf>, mount: impl Into<PathBuf>) {
        self.mounts
            .lock()
            .unwrap()
            .push((container.into(), mount.into()));
    }

    pub fn remove_mount(&self, container: impl AsRef<Path>) {
        self.mounts
            .lock()
            .unwrap()
            .retain(|(c, _)| c != container.as_ref());
    }

    pub fn fail_unmounts(&self, fail: bool) {
        self.fail_unmounts.store(fail, Ordering::SeqCst);
    }

    pub fn mount_calls(&self) -> usize {
        self.mount_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VolumeEngine for FakeEngine {
    async fn mount(&self, request: &MountRequest) -> EngineResult<()> {
        self.mount_calls.fetch_add(1, Ordering::SeqCst);
        let mut mounts = self.mounts.lock().unwrap();
        if request.password != self.password
            || mounts.iter().any(|(c, _)| *c == request.container_path)
        {
            return Err(EngineError::Failed {
                operation: "mount",
                code: Some(1),
            });
        }

        fs::write(
            request.mount_path.join(SAMPLE_FILE_NAME),
            SAMPLE_FILE_CONTENTS,
        )
        .map_err(|source| EngineError::Io {
            operation: "mount",
            source,
        })?;
        mounts.push((request.container_path.clone(), request.mount_path.clone()));
        Ok(())
    }

    async fn unmount(&self, container_path: &Path) -> EngineResult<()> {
        let failed = EngineError::Failed {
            operation: "dismount",
            code: Some(1),
        };
        if self.fail_unmounts.load(Ordering::SeqCst) {
            return Err(failed);
        }

        let mut mounts = self.mounts.lock().unwrap();
        let index = mounts
            .iter()
            .position(|(c, _)| c == container_path)
            .ok_or(failed)?;
        let (_, mount_path) = mounts.remove(index);

        if let Ok(entries) = fs::read_dir(&mount_path) {
            for entry in entries.flatten() {
                let path = entry.path();
                let _ = if path.is_dir() {
                    fs::remove_dir_all(&path)
                } else {
                    fs::remove_file(&path)
                };
            }
        }
        Ok(())
    }

    async fn list_mounted(&self) -> EngineResult<Vec<ListEntry>> {
        Ok(self
            .mounts
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(index, (container, mount))| ListEntry {
                container_path: container.clone(),
                device_path: PathBuf::from(format!("/dev/mapper/veracrypt{}", index + 1)),
                mount_path: mount.clone(),
            })
            .collect())
    }
}
