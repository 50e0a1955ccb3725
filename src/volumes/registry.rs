// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Volume discovery.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, warn};

use super::{engine::VolumeEngine, error::RegistryError, Volume};

/// The set of volumes found in the volumes directory at startup.
///
/// Built once; containers added to the directory later are not picked up
/// until the service restarts.
#[derive(Debug, Clone)]
pub struct VolumeRegistry {
    root: PathBuf,
    volumes: Vec<Volume>,
}

impl VolumeRegistry {
    /// Scan `root` and wrap every immediate entry as a volume named after it.
    pub fn open(
        root: impl AsRef<Path>,
        engine: Arc<dyn VolumeEngine>,
    ) -> Result<Self, RegistryError> {
        let registry_error = |source| RegistryError {
            path: root.as_ref().to_path_buf(),
            source,
        };

        let root = std::path::absolute(root.as_ref()).map_err(registry_error)?;
        let mut volumes = Vec::new();

        for entry in fs::read_dir(&root).map_err(registry_error)? {
            let entry = entry.map_err(registry_error)?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                warn!(entry = ?file_name, "skipping volume with non UTF-8 name");
                continue;
            };
            volumes.push(Volume::new(name, root.join(name), engine.clone()));
        }

        info!(root = %root.display(), count = volumes.len(), "volumes discovered");
        Ok(Self { root, volumes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All volumes, in directory enumeration order.
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// Exact, case-sensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&Volume> {
        self.volumes.iter().find(|volume| volume.name() == name)
    }
}
