// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for the gateway.
//!
//! API routes accept either method (checked in order):
//! 1. The configured service bearer token (`Authorization: Bearer <token>`)
//! 2. A registered, unexpired session token, from the session cookie or the
//!    `Authorization` header
//!
//! When neither method is configured, all requests are rejected (fail-closed).

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use promptdeck_auth::{AuthService, CallbackError};

use crate::server::GatewayState;

/// Authentication configuration for the gateway.
#[derive(Clone, Default)]
pub struct ApiAuth {
    /// Expected service bearer token. If `Some`, bearer auth is enabled.
    pub bearer_token: Option<String>,
    /// Magic-link sessions. If `Some`, session auth is enabled.
    pub sessions: Option<AuthService>,
}

impl std::fmt::Debug for ApiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiAuth")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("sessions", &self.sessions.is_some())
            .finish()
    }
}

fn bearer(request: &Request) -> Option<&str> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Middleware that validates the service bearer token or a session.
pub async fn auth_middleware(
    State(auth): State<ApiAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.bearer_token.is_none() && auth.sessions.is_none() {
        tracing::error!("gateway has no auth configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    }

    if let Some(expected) = auth.bearer_token.as_deref() {
        if bearer(&request) == Some(expected) {
            return Ok(next.run(request).await);
        }
    }

    if let Some(service) = &auth.sessions {
        let jar = CookieJar::from_headers(request.headers());
        let token = jar
            .get(service.cookie_name())
            .map(|c| c.value().to_string())
            .or_else(|| bearer(&request).map(str::to_string));
        if let Some(session) = token.and_then(|t| service.sessions().lookup(&t)) {
            request.extensions_mut().insert(session);
            return Ok(next.run(request).await);
        }
    }

    Err(StatusCode::UNAUTHORIZED)
}

/// Query string of the magic-link redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
}

/// GET /auth/callback
///
/// Exchanges the code, applies the domain gate and sets the session cookie.
/// Every failure redirects to the login page with an error code.
pub async fn auth_callback(
    State(state): State<GatewayState>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Response {
    let Some(service) = state.auth.sessions.as_ref() else {
        tracing::error!("auth callback hit but no auth provider is configured");
        return Redirect::to(&CallbackError::CallbackFailed.login_redirect()).into_response();
    };

    match service.complete_sign_in(params.code.as_deref()).await {
        Ok(token) => {
            let cookie = Cookie::build((service.cookie_name().to_string(), token))
                .http_only(true)
                .same_site(SameSite::Lax)
                .path("/");
            (jar.add(cookie), Redirect::to("/")).into_response()
        }
        Err(err) => Redirect::to(&err.login_redirect()).into_response(),
    }
}

/// POST /auth/logout
pub async fn logout(State(state): State<GatewayState>, jar: CookieJar) -> Response {
    let Some(service) = state.auth.sessions.as_ref() else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let name = service.cookie_name().to_string();
    if let Some(cookie) = jar.get(&name) {
        service.sign_out(cookie.value()).await;
    }
    let jar = jar.remove(Cookie::build(name).path("/"));
    (jar, StatusCode::NO_CONTENT).into_response()
}
