// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Responses are hypermedia
//! documents: every resource carries a `_links` array of `{rel, href}`
//! pairs the client follows instead of building URLs itself.
//!
//! ## Model Categories
//!
//! - **Root**: entry point linking to the volume collection
//! - **Volumes**: volume summaries and the mount request body
//! - **Files**: directory listings of a mounted volume

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::files::{DirectoryEntry, EntryKind};

// =============================================================================
// Hypermedia
// =============================================================================

/// A typed link to a related resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Link {
    /// Relation name (`self`, `volumes`, `files`).
    pub rel: String,
    /// Absolute path of the related resource.
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// API entry point.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

// =============================================================================
// Volume Models
// =============================================================================

/// Public view of one volume.
///
/// A `files` link is present only while the volume is mounted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct VolumeSummary {
    /// Container file name.
    pub name: String,
    /// Whether the engine currently reports the volume as mounted.
    pub mounted: bool,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

/// All volumes known to the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VolumeListResponse {
    pub volumes: Vec<VolumeSummary>,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

/// Body of `PUT /volumes/{name}`.
///
/// Missing fields take their defaults; a body that is not a JSON object
/// is treated as an empty password.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MountVolumeRequest {
    /// Volume password.
    #[serde(default)]
    pub password: String,
    /// Mount read-only.
    #[serde(default)]
    pub readonly: bool,
}

impl MountVolumeRequest {
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

// =============================================================================
// File Models
// =============================================================================

/// One child of a browsed directory.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DirectoryEntryResponse {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    /// Last modification time (UTC).
    pub modified: DateTime<Utc>,
    /// Size in bytes, files only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl DirectoryEntryResponse {
    pub fn new(entry: DirectoryEntry, links: Vec<Link>) -> Self {
        Self {
            kind: entry.kind,
            name: entry.name,
            modified: entry.modified,
            size: entry.size,
            links,
        }
    }
}

/// Contents of a browsed directory.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DirectoryListing {
    pub contents: Vec<DirectoryEntryResponse>,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_request_reads_password() {
        let request = MountVolumeRequest::from_body(br#"{"password":"foo"}"#);
        assert_eq!(request.password, "foo");
        assert!(!request.readonly);
    }

    #[test]
    fn mount_request_reads_readonly_flag() {
        let request = MountVolumeRequest::from_body(br#"{"password":"foo","readonly":true}"#);
        assert!(request.readonly);
    }

    #[test]
    fn malformed_mount_request_means_empty_password() {
        let bodies: [&[u8]; 6] = [b"", b"null", b"[1,2]", b"\"foo\"", br#"{"password":42}"#, b"{"];
        for body in bodies {
            let request = MountVolumeRequest::from_body(body);
            assert_eq!(request.password, "");
            assert!(!request.readonly);
        }
    }

    #[test]
    fn summary_serializes_links_under_underscore_key() {
        let summary = VolumeSummary {
            name: "test".to_string(),
            mounted: false,
            links: vec![Link::new("self", "/volumes/test")],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "test",
                "mounted": false,
                "_links": [{"rel": "self", "href": "/volumes/test"}]
            })
        );
    }

    #[test]
    fn directory_entries_omit_size_for_directories() {
        let modified = DateTime::<Utc>::UNIX_EPOCH;
        let dir = DirectoryEntryResponse::new(
            DirectoryEntry {
                name: "docs".to_string(),
                kind: EntryKind::Directory,
                modified,
                size: None,
            },
            vec![],
        );
        let file = DirectoryEntryResponse::new(
            DirectoryEntry {
                name: "bar.txt".to_string(),
                kind: EntryKind::File,
                modified,
                size: Some(11),
            },
            vec![],
        );

        let dir = serde_json::to_value(&dir).unwrap();
        assert_eq!(dir["type"], "directory");
        assert!(dir.get("size").is_none());
        assert_eq!(dir["modified"], "1970-01-01T00:00:00Z");

        let file = serde_json::to_value(&file).unwrap();
        assert_eq!(file["type"], "file");
        assert_eq!(file["size"], 11);
    }
}
