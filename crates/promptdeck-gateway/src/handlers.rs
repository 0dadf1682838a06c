// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the card API.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use promptdeck_core::query::page_after_removal;
use promptdeck_core::{
    Card, CardId, CardUrls, ConfirmationRequest, FilterOptions, HealthStatus, ListQuery,
    PaginatedResult, PluginAdapter, PromptdeckError, SortOrder,
};
use promptdeck_export::{ExportFormat, export, export_file_name};

use crate::error::{ApiError, ErrorResponse};
use crate::form::CardForm;
use crate::server::GatewayState;

/// Query string of GET /v1/cards.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, alias = "favoritesOnly", alias = "favorites_only")]
    pub favorites: Option<bool>,
    #[serde(default, alias = "sortBy")]
    pub sort_by: Option<SortOrder>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<u32>,
}

/// Body of PATCH /v1/cards/{id}/favorite.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub is_favorited: bool,
}

/// Body of the id-set endpoints.
#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<CardId>,
}

/// Body of POST /v1/export.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub ids: Vec<CardId>,
    #[serde(default)]
    pub format: ExportFormat,
}

/// Query string of DELETE /v1/cards/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub cards_on_page: Option<u32>,
    /// Filtered total before the delete; counted from the table when absent.
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Response body of a confirmed delete.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
    /// Page the gallery should show next.
    pub refresh_page: u32,
}

/// Response body for the health endpoints.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub records: String,
    pub objects: String,
}

fn describe(status: &HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => "healthy".to_string(),
        HealthStatus::Degraded(why) => format!("degraded: {why}"),
        HealthStatus::Unhealthy(why) => format!("unhealthy: {why}"),
    }
}

async fn health(state: &GatewayState) -> (StatusCode, HealthResponse) {
    let records = state
        .lifecycle
        .records()
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
    let objects = state
        .objects
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));

    let healthy = records.is_healthy() && objects.is_healthy();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        records: describe(&records),
        objects: describe(&objects),
    };
    (status, body)
}

/// GET /health
pub async fn get_public_health(State(state): State<GatewayState>) -> Response {
    let (status, body) = health(&state).await;
    (status, Json(serde_json::json!({ "status": body.status }))).into_response()
}

/// GET /v1/health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (status, body) = health(&state).await;
    (status, Json(body)).into_response()
}

/// Build the record-store query from the request, applying defaults and the page-size cap.
pub fn list_query(params: ListParams, state: &GatewayState) -> ListQuery {
    let page_size = params
        .page_size
        .unwrap_or(state.gallery.default_page_size)
        .min(state.gallery.max_page_size);
    ListQuery {
        client: params.client,
        model: params.model,
        favorites_only: params.favorites.unwrap_or(false),
        sort_by: params.sort_by.unwrap_or_default(),
        page: params.page.unwrap_or(1),
        page_size,
    }
}

/// GET /v1/cards
pub async fn list_cards(
    State(state): State<GatewayState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedResult>, ApiError> {
    let query = list_query(params, &state);
    let page = state.lifecycle.records().list(&query).await?;
    Ok(Json(page))
}

/// GET /v1/cards/{id}
pub async fn get_card(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let id = CardId::from(id);
    let card = state
        .lifecycle
        .records()
        .get(&id)
        .await?
        .ok_or(PromptdeckError::NotFound { id })?;
    Ok(Json(card))
}

/// POST /v1/cards (multipart)
pub async fn create_card(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let draft = CardForm::read(multipart).await?.into_draft()?;
    let card = state.lifecycle.create(draft).await?;
    tracing::info!(card_id = %card.id, "card created");
    Ok((StatusCode::CREATED, Json(card)))
}

/// PATCH /v1/cards/{id} (multipart)
pub async fn update_card(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Card>, ApiError> {
    let edit = CardForm::read(multipart).await?.into_edit();
    let card = state.lifecycle.update(&CardId::from(id), edit).await?;
    tracing::info!(card_id = %card.id, "card updated");
    Ok(Json(card))
}

/// PATCH /v1/cards/{id}/favorite
pub async fn set_favorite(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<Card>, ApiError> {
    let card = state
        .lifecycle
        .set_favorite(&CardId::from(id), body.is_favorited)
        .await?;
    Ok(Json(card))
}

/// DELETE /v1/cards/{id}
///
/// Without `confirm=true` nothing is deleted: the response is 409 with the
/// confirmation the client must show.
pub async fn delete_card(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<Response, ApiError> {
    let id = CardId::from(id);
    let records = state.lifecycle.records();

    if !params.confirm {
        let card = records
            .get(&id)
            .await?
            .ok_or(PromptdeckError::NotFound { id })?;
        let request = ConfirmationRequest::delete_card(&card);
        return Ok((StatusCode::CONFLICT, Json(request)).into_response());
    }

    let total_before = match params.total_count {
        Some(total) => total,
        None => records.list(&ListQuery::new().page(1, 1)).await?.total_count,
    };

    state.lifecycle.delete(&id).await?;
    tracing::info!(card_id = %id, "card deleted");

    let page_size = params
        .page_size
        .unwrap_or(state.gallery.default_page_size)
        .max(1);
    let refresh_page = page_after_removal(
        params.page.unwrap_or(1),
        params.cards_on_page.unwrap_or(1),
        total_before,
        page_size,
    );
    Ok(Json(DeleteResponse {
        success: true,
        refresh_page,
    })
    .into_response())
}

/// POST /v1/cards/lookup
pub async fn lookup_cards(
    State(state): State<GatewayState>,
    Json(body): Json<IdsRequest>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = state.lifecycle.records().get_by_ids(&body.ids).await?;
    Ok(Json(cards))
}

/// POST /v1/cards/urls
pub async fn resolve_urls(
    State(state): State<GatewayState>,
    Json(body): Json<IdsRequest>,
) -> Result<Json<Vec<CardUrls>>, ApiError> {
    let urls = state
        .lifecycle
        .resolve_urls(&body.ids, state.url_ttl)
        .await?;
    Ok(Json(urls))
}

/// GET /v1/filter-options
pub async fn filter_options(
    State(state): State<GatewayState>,
) -> Result<Json<FilterOptions>, ApiError> {
    Ok(Json(state.lifecycle.records().filter_options().await?))
}

/// POST /v1/export
pub async fn export_cards(
    State(state): State<GatewayState>,
    Json(body): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    if body.ids.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "select at least one card to export".to_string(),
                field: None,
            }),
        )
            .into_response());
    }

    let cards = state.lifecycle.records().get_by_ids(&body.ids).await?;
    let now = chrono::Utc::now();
    let content = export(&cards, body.format, now)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(body.format, now.date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, body.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}
