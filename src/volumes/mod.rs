// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Volume Lifecycle
//!
//! Discovery, mounting and dismounting of VeraCrypt containers.
//!
//! ## Model
//!
//! - [`VolumeRegistry`] scans the volumes directory once at startup.
//! - [`Volume`] is one container; its mount state is derived from the
//!   engine's live mount table, never cached.
//! - [`VolumeEngine`] is the boundary to the external tool;
//!   [`VeraCryptEngine`] drives the real binary.
//! - [`MountSessions`] owns the temporary mount directories.
//!
//! ```text
//! registry ──► volume ──► engine ──► veracrypt --text ...
//!                 ▲
//!                 └── sessions (mkdtemp / cleanup)
//! ```

pub mod engine;
pub mod error;
pub mod list;
pub mod registry;
pub mod session;
mod volume;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{MountRequest, VeraCryptEngine, VolumeEngine};
pub use error::{EngineError, MountError, RegistryError};
pub use list::{parse_list_output, ListEntry};
pub use registry::VolumeRegistry;
pub use session::MountSessions;
pub use volume::Volume;
