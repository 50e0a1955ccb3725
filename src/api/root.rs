// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use super::links::volumes_href;
use crate::models::{Link, RootResponse};

/// API entry point.
#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    responses(
        (status = 200, description = "Links to top-level resources", body = RootResponse)
    )
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        links: vec![Link::new("volumes", volumes_href())],
    })
}
