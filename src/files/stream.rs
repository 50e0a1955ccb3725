// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Streaming of file contents out of a mounted volume.

use std::{io, path::Path};

use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Build a streaming response for an already resolved file.
///
/// The open handle is owned by the response body and closed when the body
/// is dropped, whether the transfer completed or the client went away.
pub async fn file_response(path: &Path) -> io::Result<Response<Body>> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(path)),
        )
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(io::Error::other)
}

/// Content type guessed from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("txt" | "log" | "md") => "text/plain; charset=utf-8",
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}
