// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `promptdeck serve` command implementation.
//!
//! Opens the card table and the bucket, wires the lifecycle and the auth
//! boundary into the gateway, and serves until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use promptdeck_auth::{AuthService, HttpAuthProvider};
use promptdeck_config::model::PromptdeckConfig;
use promptdeck_core::{PromptdeckError, RecordStoreAdapter};
use promptdeck_gateway::{ApiAuth, GalleryLimits, GatewayState, start_server};
use promptdeck_lifecycle::{CardLifecycle, FileValidator};
use promptdeck_objects::LocalObjectStore;
use promptdeck_storage::SqliteRecordStore;

/// How often expired sessions are dropped from the registry.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// Runs the `promptdeck serve` command.
pub async fn run_serve(config: PromptdeckConfig) -> Result<(), PromptdeckError> {
    info!(name = %config.app.name, "starting promptdeck serve");

    let records = Arc::new(SqliteRecordStore::open(config.storage.clone()).await?);
    let objects = Arc::new(LocalObjectStore::from_config(&config.objects, &config.server));
    objects.ensure_folders().await?;
    info!(
        database = %config.storage.database_path,
        bucket = %config.objects.bucket,
        root = %config.objects.root_dir,
        "storage ready"
    );

    let sessions = match config.auth.provider_url.as_deref() {
        Some(url) => {
            let provider = HttpAuthProvider::new(url, config.auth.api_key.as_deref())?;
            info!(
                domain = %config.auth.allowed_email_domain,
                "magic-link sign-in enabled"
            );
            Some(AuthService::from_config(Arc::new(provider), &config.auth))
        }
        None => None,
    };
    if config.server.bearer_token.is_none() && sessions.is_none() {
        warn!("no bearer token and no auth provider configured; every API request will be rejected");
    }

    let lifecycle = CardLifecycle::new(
        objects.clone(),
        records.clone(),
        FileValidator::new(config.uploads.max_size_mb),
    );
    let state = GatewayState::new(
        lifecycle,
        objects,
        ApiAuth {
            bearer_token: config.server.bearer_token.clone(),
            sessions: sessions.clone(),
        },
        GalleryLimits::from(&config.gallery),
        Duration::from_secs(config.objects.url_ttl_secs),
    );

    let cancel = install_signal_handler();
    if let Some(service) = sessions {
        spawn_session_purge(service, cancel.clone());
    }

    let shutdown = {
        let cancel = cancel.clone();
        async move { cancel.cancelled().await }
    };
    let served = start_server(&config.server.host, config.server.port, state, shutdown).await;
    cancel.cancel();

    records.close().await?;
    info!("promptdeck stopped");
    served
}

/// Installs handlers for SIGTERM and SIGINT (Ctrl+C).
///
/// Returns a [`CancellationToken`] cancelled when either signal arrives.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                        _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, waiting for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

fn spawn_session_purge(service: AuthService, cancel: CancellationToken) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let purged = service.sessions().purge_expired(chrono::Utc::now());
                    if purged > 0 {
                        debug!(purged, "expired sessions dropped");
                    }
                }
            }
        }
    });
}
