// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`PromptdeckError`] onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use promptdeck_core::PromptdeckError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable description.
    pub error: String,
    /// Form field the error refers to, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// Handler error wrapper so `?` works on [`PromptdeckError`].
#[derive(Debug)]
pub struct ApiError(pub PromptdeckError);

impl From<PromptdeckError> for ApiError {
    fn from(err: PromptdeckError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PromptdeckError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            // Rejected before reaching the store: a required field is blank.
            PromptdeckError::InsertFailed { source: None, .. }
            | PromptdeckError::UpdateFailed { source: None, .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PromptdeckError::NotFound { .. } => StatusCode::NOT_FOUND,
            PromptdeckError::UrlExpired { .. }
            | PromptdeckError::InvalidSignature { .. }
            | PromptdeckError::AuthDomainRejected { .. } => StatusCode::FORBIDDEN,
            PromptdeckError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::warn!(status = %status, error = %self.0, "request rejected");
        } else {
            tracing::error!(status = %status, error = %self.0, "request failed");
        }

        let field = match &self.0 {
            PromptdeckError::Validation { folder, .. } => Some(folder.form_field()),
            _ => None,
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            field,
        };
        (status, Json(body)).into_response()
    }
}
