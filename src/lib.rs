// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Volume Gateway - Encrypted Volume HTTP Service
//!
//! Discovers VeraCrypt containers in a directory, mounts them on request and
//! serves the decrypted filesystem tree over a hypermedia JSON API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `config` - Environment configuration
//! - `files` - Path containment, directory listings and file streaming
//! - `volumes` - Volume discovery and the VeraCrypt engine driver

pub mod api;
pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod state;
pub mod volumes;
