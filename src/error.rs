// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::{
    files::ResolveError,
    volumes::{EngineError, MountError},
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Engine faults outside of mounting never reach the caller in detail.
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        error!(error = %err, "encryption engine failure");
        ApiError::internal("Encryption engine failure")
    }
}

/// Every engine-side mount failure is reported as 401 so callers cannot
/// tell a wrong password from a damaged container.
impl From<MountError> for ApiError {
    fn from(err: MountError) -> Self {
        match err {
            MountError::Rejected(_) => ApiError::unauthorized("Unable to mount volume"),
            MountError::Engine(cause) => {
                error!(error = %cause, "encryption engine failure during mount");
                ApiError::unauthorized("Unable to mount volume")
            }
            MountError::MountDirectory { .. } => {
                error!(error = %err, "mount directory unavailable");
                ApiError::internal("Unable to prepare mount directory")
            }
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Escapes(_) => ApiError::bad_request("Path is outside the volume"),
            ResolveError::NotFound(path) => ApiError::not_found(format!("Path {path} not found")),
            ResolveError::Root(_) | ResolveError::Io { .. } => {
                error!(error = %err, "failed to resolve path");
                ApiError::internal("Failed to read volume")
            }
        }
    }
}
