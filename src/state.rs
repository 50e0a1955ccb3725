// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::volumes::{MountSessions, VolumeRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<VolumeRegistry>,
    pub sessions: Arc<MountSessions>,
}

impl AppState {
    pub fn new(registry: VolumeRegistry, sessions: MountSessions) -> Self {
        Self {
            registry: Arc::new(registry),
            sessions: Arc::new(sessions),
        }
    }
}
