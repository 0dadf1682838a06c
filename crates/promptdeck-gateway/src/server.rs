// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use promptdeck_config::model::GalleryConfig;
use promptdeck_core::PromptdeckError;
use promptdeck_lifecycle::CardLifecycle;
use promptdeck_objects::LocalObjectStore;

use crate::auth::{ApiAuth, auth_callback, auth_middleware, logout};
use crate::handlers;
use crate::objects::serve_object;

/// Multipart overhead allowed on top of two maximum-size images.
const FORM_SLACK_BYTES: usize = 1024 * 1024;

/// Page-size bounds for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl From<&GalleryConfig> for GalleryLimits {
    fn from(config: &GalleryConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}

impl Default for GalleryLimits {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Card mutations and the adapters behind them.
    pub lifecycle: CardLifecycle,
    /// Bucket used to serve signed object URLs.
    pub objects: Arc<LocalObjectStore>,
    /// Authentication configuration.
    pub auth: ApiAuth,
    pub gallery: GalleryLimits,
    /// Lifetime of issued read URLs.
    pub url_ttl: Duration,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(
        lifecycle: CardLifecycle,
        objects: Arc<LocalObjectStore>,
        auth: ApiAuth,
        gallery: GalleryLimits,
        url_ttl: Duration,
    ) -> Self {
        Self {
            lifecycle,
            objects,
            auth,
            gallery,
            url_ttl,
            start_time: Instant::now(),
        }
    }
}

/// Build the full route table.
///
/// Public routes:
/// - GET /health
/// - GET /objects/{*path} (signed URL)
/// - GET /auth/callback, POST /auth/logout
///
/// Everything under /v1 goes through [`auth_middleware`].
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();
    let max_form_bytes = usize::try_from(state.lifecycle.validator().max_size_bytes())
        .unwrap_or(usize::MAX / 4)
        .saturating_mul(2)
        .saturating_add(FORM_SLACK_BYTES);

    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .route("/objects/{*path}", get(serve_object))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/logout", post(logout))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/health", get(handlers::get_health))
        .route(
            "/v1/cards",
            get(handlers::list_cards).post(handlers::create_card),
        )
        .route(
            "/v1/cards/{id}",
            get(handlers::get_card)
                .patch(handlers::update_card)
                .delete(handlers::delete_card),
        )
        .route("/v1/cards/{id}/favorite", patch(handlers::set_favorite))
        .route("/v1/cards/lookup", post(handlers::lookup_cards))
        .route("/v1/cards/urls", post(handlers::resolve_urls))
        .route("/v1/filter-options", get(handlers::filter_options))
        .route("/v1/export", post(handlers::export_cards))
        .layer(DefaultBodyLimit::max(max_form_bytes))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn start_server(
    host: &str,
    port: u16,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), PromptdeckError> {
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PromptdeckError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PromptdeckError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
