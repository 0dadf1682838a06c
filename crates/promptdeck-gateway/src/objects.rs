// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed object serving. The URL itself is the credential.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct SignedParams {
    pub expires: i64,
    pub signature: String,
}

/// MIME type served for an object path, by extension.
pub fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// GET /objects/{*path}?expires=&signature=
pub async fn serve_object(
    State(state): State<GatewayState>,
    Path(path): Path<String>,
    Query(params): Query<SignedParams>,
) -> Result<Response, ApiError> {
    let now = chrono::Utc::now().timestamp();
    let bytes = state
        .objects
        .read_signed(&path, params.expires, &params.signature, now)
        .await?;

    match bytes {
        Some(bytes) => Ok((
            [
                (header::CONTENT_TYPE, content_type_for(&path)),
                (header::CACHE_CONTROL, "private, max-age=3600"),
            ],
            bytes,
        )
            .into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}
