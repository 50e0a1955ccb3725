// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Volume API endpoints.
//!
//! These endpoints list the discovered volumes, report their mount state and
//! mount/dismount them. Mounting is the only authenticated step: the volume
//! password is checked by the encryption engine itself.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use super::links::{files_href, volume_href, volumes_href};
use crate::{
    error::ApiError,
    models::{Link, MountVolumeRequest, VolumeListResponse, VolumeSummary},
    state::AppState,
    volumes::Volume,
};

/// Look up a volume by name or fail with 404.
pub(super) fn find_volume<'a>(state: &'a AppState, name: &str) -> Result<&'a Volume, ApiError> {
    state
        .registry
        .get(name)
        .ok_or_else(|| ApiError::not_found(format!("Volume {name} not found")))
}

/// Render a volume with its current mount state.
pub(super) async fn summarize(volume: &Volume) -> Result<VolumeSummary, ApiError> {
    let mounted = volume.is_mounted().await?;

    let mut links = vec![Link::new("self", volume_href(volume.name()))];
    if mounted {
        links.push(Link::new("files", files_href(volume.name(), "")));
    }

    Ok(VolumeSummary {
        name: volume.name().to_string(),
        mounted,
        links,
    })
}

/// List all discovered volumes.
#[utoipa::path(
    get,
    path = "/volumes",
    tag = "Volumes",
    responses(
        (status = 200, description = "All volumes", body = VolumeListResponse),
        (status = 500, description = "Encryption engine failure")
    )
)]
pub async fn list_volumes(
    State(state): State<AppState>,
) -> Result<Json<VolumeListResponse>, ApiError> {
    let mut volumes = Vec::with_capacity(state.registry.volumes().len());
    for volume in state.registry.volumes() {
        volumes.push(summarize(volume).await?);
    }

    Ok(Json(VolumeListResponse {
        volumes,
        links: vec![Link::new("self", volumes_href())],
    }))
}

/// Get the state of one volume.
#[utoipa::path(
    get,
    path = "/volumes/{name}",
    tag = "Volumes",
    params(
        ("name" = String, Path, description = "Volume name")
    ),
    responses(
        (status = 200, description = "Volume state", body = VolumeSummary),
        (status = 404, description = "Volume not found")
    )
)]
pub async fn get_volume(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<VolumeSummary>, ApiError> {
    let volume = find_volume(&state, &name)?;
    Ok(Json(summarize(volume).await?))
}

/// Mount a volume with the supplied password.
///
/// Already mounted volumes are returned unchanged. Any engine-side failure
/// is reported as 401 without further detail.
#[utoipa::path(
    put,
    path = "/volumes/{name}",
    tag = "Volumes",
    params(
        ("name" = String, Path, description = "Volume name")
    ),
    request_body = MountVolumeRequest,
    responses(
        (status = 200, description = "Volume mounted", body = VolumeSummary),
        (status = 401, description = "Mount failed"),
        (status = 404, description = "Volume not found")
    )
)]
pub async fn mount_volume(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<VolumeSummary>, ApiError> {
    let volume = find_volume(&state, &name)?;
    let request = MountVolumeRequest::from_body(&body);

    if !volume.is_mounted().await? {
        state
            .sessions
            .open(volume, &request.password, request.readonly)
            .await?;
    }

    Ok(Json(summarize(volume).await?))
}

/// Dismount a volume. Dismounting an unmounted volume is a no-op.
#[utoipa::path(
    delete,
    path = "/volumes/{name}",
    tag = "Volumes",
    params(
        ("name" = String, Path, description = "Volume name")
    ),
    responses(
        (status = 200, description = "Volume dismounted", body = VolumeSummary),
        (status = 404, description = "Volume not found"),
        (status = 500, description = "Encryption engine failure")
    )
)]
pub async fn unmount_volume(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<VolumeSummary>, ApiError> {
    let volume = find_volume(&state, &name)?;

    if volume.is_mounted().await? {
        state.sessions.close(volume).await?;
    }

    Ok(Json(summarize(volume).await?))
}
