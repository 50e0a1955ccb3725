// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Browsing of mounted volumes: path validation, listings and downloads.

pub mod listing;
pub mod resolver;
pub mod stream;

pub use listing::{list_directory, DirectoryEntry, EntryKind};
pub use resolver::{resolve, ResolveError, ResolvedPath};
pub use stream::file_response;
