// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File browsing endpoints.
//!
//! Every request re-reads the mount path from the engine and validates the
//! requested path against it before touching the filesystem.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use tokio::task;
use tracing::error;

use super::{links::files_href, volumes::find_volume};
use crate::{
    error::ApiError,
    files::{file_response, list_directory, resolve, ResolvedPath},
    models::{DirectoryEntryResponse, DirectoryListing, Link},
    state::AppState,
};

/// Browse the root directory of a mounted volume.
#[utoipa::path(
    get,
    path = "/volumes/{name}/files",
    tag = "Files",
    params(
        ("name" = String, Path, description = "Volume name")
    ),
    responses(
        (status = 200, description = "Directory listing", body = DirectoryListing),
        (status = 400, description = "Volume not mounted"),
        (status = 404, description = "Volume not found")
    )
)]
pub async fn browse_root(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    browse(&state, &name, "").await
}

/// Download a file or list a directory inside a mounted volume.
#[utoipa::path(
    get,
    path = "/volumes/{name}/files/{path}",
    tag = "Files",
    params(
        ("name" = String, Path, description = "Volume name"),
        ("path" = String, Path, description = "Path relative to the volume root")
    ),
    responses(
        (status = 200, description = "File contents or directory listing", body = DirectoryListing),
        (status = 400, description = "Volume not mounted or path outside the volume"),
        (status = 404, description = "Volume or path not found")
    )
)]
pub async fn browse_path(
    State(state): State<AppState>,
    Path((name, path)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    browse(&state, &name, &path).await
}

async fn browse(state: &AppState, name: &str, path: &str) -> Result<Response, ApiError> {
    let volume = find_volume(state, name)?;
    let mount_path = volume
        .mount_path()
        .await?
        .ok_or_else(|| ApiError::bad_request(format!("Volume {name} is not mounted")))?;

    let requested = path.to_string();
    let resolved = task::spawn_blocking(move || resolve(&mount_path, &requested))
        .await
        .map_err(|err| {
            error!(volume = %name, error = %err, "path resolution task failed");
            ApiError::internal("Failed to read volume")
        })??;

    match resolved {
        ResolvedPath::File(file) => file_response(&file).await.map_err(|err| {
            error!(volume = %name, error = %err, "failed to open file");
            ApiError::internal("Failed to read file")
        }),
        ResolvedPath::Directory(directory) => {
            let relative = path.trim_matches('/');
            let mut entries = task::spawn_blocking(move || list_directory(&directory))
                .await
                .map_err(std::io::Error::other)
                .and_then(|listed| listed)
                .map_err(|err| {
                    error!(volume = %name, error = %err, "failed to list directory");
                    ApiError::internal("Failed to read directory")
                })?;
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            let contents = entries
                .into_iter()
                .map(|entry| {
                    let href = files_href(name, &format!("{relative}/{}", entry.name));
                    DirectoryEntryResponse::new(entry, vec![Link::new("self", href)])
                })
                .collect();

            Ok(Json(DirectoryListing {
                contents,
                links: vec![Link::new("self", files_href(name, relative))],
            })
            .into_response())
        }
    }
}
