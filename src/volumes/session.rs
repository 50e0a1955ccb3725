// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mount sessions: a volume paired with a temporary mount directory.
//!
//! The directory is created here before the engine is invoked. Both a failed
//! mount and a successful dismount remove it again, non-recursively: a
//! directory that still has contents may be a live mount and is left alone.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tokio::task;
use tracing::{debug, warn};

use super::{
    error::{EngineResult, MountError},
    Volume, VolumeRegistry,
};

/// Creates and cleans up mount directories under one root.
#[derive(Debug, Clone)]
pub struct MountSessions {
    mount_root: PathBuf,
}

impl MountSessions {
    pub fn new(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: mount_root.into(),
        }
    }

    pub fn mount_root(&self) -> &Path {
        &self.mount_root
    }

    /// Mount `volume` into a freshly created directory and return its path.
    pub async fn open(
        &self,
        volume: &Volume,
        password: &str,
        readonly: bool,
    ) -> Result<PathBuf, MountError> {
        let mount_path = self
            .create_mount_dir(volume.name())
            .await
            .map_err(|source| MountError::MountDirectory {
                root: self.mount_root.clone(),
                source,
            })?;

        if let Err(error) = volume.mount(password, &mount_path, readonly).await {
            self.remove_mount_dir(&mount_path).await;
            return Err(error);
        }
        Ok(mount_path)
    }

    /// Dismount `volume` and remove its session directory.
    ///
    /// Directories outside the mount root (mounted by someone else) are left
    /// alone.
    pub async fn close(&self, volume: &Volume) -> EngineResult<()> {
        let mount_path = volume.mount_path().await?;
        volume.unmount().await?;

        if let Some(mount_path) = mount_path {
            self.remove_mount_dir(&mount_path).await;
        }
        Ok(())
    }

    /// Dismount every mounted volume in `registry`, returning how many were
    /// dismounted. Failures are logged and skipped.
    pub async fn close_all(&self, registry: &VolumeRegistry) -> usize {
        let mut closed = 0;
        for volume in registry.volumes() {
            match volume.is_mounted().await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(error) => {
                    warn!(volume = %volume.name(), error = %error, "failed to query mount state");
                    continue;
                }
            }
            if self.close(volume).await.is_ok() {
                closed += 1;
            }
        }
        closed
    }

    /// Create a uniquely named directory under the mount root. The `TempDir`
    /// guard is released immediately: from here on only [`Self::remove_mount_dir`]
    /// may delete it.
    async fn create_mount_dir(&self, volume_name: &str) -> io::Result<PathBuf> {
        let root = self.mount_root.clone();
        let prefix = format!("{volume_name}-");
        task::spawn_blocking(move || -> io::Result<PathBuf> {
            fs::create_dir_all(&root)?;
            let dir = tempfile::Builder::new().prefix(&prefix).tempdir_in(&root)?;
            Ok(dir.keep())
        })
        .await
        .map_err(io::Error::other)?
    }

    async fn remove_mount_dir(&self, mount_path: &Path) {
        if !self.owns(mount_path).await {
            debug!(mount_path = %mount_path.display(), "mount directory not owned, leaving in place");
            return;
        }
        match tokio::fs::remove_dir(mount_path).await {
            Ok(()) => debug!(mount_path = %mount_path.display(), "mount directory removed"),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => warn!(
                mount_path = %mount_path.display(),
                error = %error,
                "failed to remove mount directory"
            ),
        }
    }

    async fn owns(&self, mount_path: &Path) -> bool {
        let parent = match mount_path.parent() {
            Some(parent) => parent,
            None => return false,
        };
        if parent == self.mount_root {
            return true;
        }
        match (
            tokio::fs::canonicalize(parent).await,
            tokio::fs::canonicalize(&self.mount_root).await,
        ) {
            (Ok(parent), Ok(root)) => parent == root,
            _ => false,
        }
    }
}
