// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! A single encrypted container and its mount state.
//!
//! A [`Volume`] holds no mutable state. Whether it is mounted, and where,
//! is read from the engine's live mount table on every query so the answer
//! stays correct when the container is mounted or dismounted by another
//! process.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, warn};

use super::{
    engine::{MountRequest, VolumeEngine},
    error::{EngineResult, MountError},
    list::ListEntry,
};

/// One discovered volume container.
#[derive(Clone)]
pub struct Volume {
    name: String,
    container_path: PathBuf,
    engine: Arc<dyn VolumeEngine>,
}

impl fmt::Debug for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Volume")
            .field("name", &self.name)
            .field("container_path", &self.container_path)
            .finish_non_exhaustive()
    }
}

impl Volume {
    pub fn new(
        name: impl Into<String>,
        container_path: impl Into<PathBuf>,
        engine: Arc<dyn VolumeEngine>,
    ) -> Self {
        Self {
            name: name.into(),
            container_path: container_path.into(),
            engine,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container_path(&self) -> &Path {
        &self.container_path
    }

    /// The engine's list entry for this container, if mounted.
    pub async fn list_entry(&self) -> EngineResult<Option<ListEntry>> {
        let entries = self.engine.list_mounted().await?;
        Ok(entries
            .into_iter()
            .find(|entry| entry.container_path == self.container_path))
    }

    pub async fn is_mounted(&self) -> EngineResult<bool> {
        Ok(self.list_entry().await?.is_some())
    }

    pub async fn mount_path(&self) -> EngineResult<Option<PathBuf>> {
        Ok(self.list_entry().await?.map(|entry| entry.mount_path))
    }

    /// Mount the container at `mount_path`, which must already exist.
    ///
    /// On failure the directory is left in place; its creator removes it.
    pub async fn mount(
        &self,
        password: &str,
        mount_path: &Path,
        readonly: bool,
    ) -> Result<(), MountError> {
        let request = MountRequest {
            container_path: self.container_path.clone(),
            mount_path: mount_path.to_path_buf(),
            password: password.to_string(),
            readonly,
        };

        match self.engine.mount(&request).await {
            Ok(()) => {
                info!(
                    volume = %self.name,
                    mount_path = %mount_path.display(),
                    readonly,
                    "volume mounted"
                );
                Ok(())
            }
            Err(error) => {
                warn!(volume = %self.name, error = %error, "mount failed");
                Err(error.into())
            }
        }
    }

    /// Dismount the container. A failure leaves the volume mounted.
    pub async fn unmount(&self) -> EngineResult<()> {
        self.engine
            .unmount(&self.container_path)
            .await
            .inspect(|_| info!(volume = %self.name, "volume dismounted"))
            .inspect_err(|error| warn!(volume = %self.name, error = %error, "dismount failed"))
    }
}
