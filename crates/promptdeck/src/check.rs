// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `promptdeck check` command implementation.
//!
//! Runs diagnostic checks against the configured table, bucket and auth
//! provider. Configuration has already been validated by the time this runs.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use promptdeck_auth::HttpAuthProvider;
use promptdeck_config::model::PromptdeckConfig;
use promptdeck_core::{HealthStatus, PluginAdapter, PromptdeckError, RecordStoreAdapter};
use promptdeck_objects::LocalObjectStore;
use promptdeck_storage::SqliteRecordStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn from_health(
        name: &str,
        health: Result<HealthStatus, PromptdeckError>,
        start: Instant,
    ) -> Self {
        let (status, message) = match health {
            Ok(HealthStatus::Healthy) => (CheckStatus::Pass, "healthy".to_string()),
            Ok(HealthStatus::Degraded(why)) => (CheckStatus::Warn, why),
            Ok(HealthStatus::Unhealthy(why)) => (CheckStatus::Fail, why),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        };
        Self {
            name: name.to_string(),
            status,
            message,
            duration: start.elapsed(),
        }
    }
}

/// Run the `promptdeck check` command.
///
/// Fails when any check fails; warnings are reported but do not fail.
pub async fn run_check(config: &PromptdeckConfig, plain: bool) -> Result<(), PromptdeckError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        CheckResult {
            name: "Configuration".to_string(),
            status: CheckStatus::Pass,
            message: "valid".to_string(),
            duration: Duration::ZERO,
        },
        check_database(config).await,
        check_bucket(config).await,
        check_auth(config).await,
    ];

    println!();
    println!("  promptdeck check");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let failures = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let warnings = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warn)
        .count();
    if failures + warnings == 0 {
        println!("  All checks passed.");
    } else {
        let issues = failures + warnings;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    }
    println!();

    if failures > 0 {
        return Err(PromptdeckError::Internal(format!("{failures} check(s) failed")));
    }
    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Open the card table (running migrations) and run its health check.
async fn check_database(config: &PromptdeckConfig) -> CheckResult {
    let start = Instant::now();
    match SqliteRecordStore::open(config.storage.clone()).await {
        Ok(store) => {
            let health = store.health_check().await;
            let _ = store.close().await;
            CheckResult::from_health("Database", health, start)
        }
        Err(e) => CheckResult {
            name: "Database".to_string(),
            status: CheckStatus::Fail,
            message: format!("open failed: {e}"),
            duration: start.elapsed(),
        },
    }
}

async fn check_bucket(config: &PromptdeckConfig) -> CheckResult {
    let start = Instant::now();
    let store = LocalObjectStore::from_config(&config.objects, &config.server);
    let mut result = CheckResult::from_health("Bucket", store.health_check().await, start);
    if result.status == CheckStatus::Pass && config.objects.signing_key.is_none() {
        result.status = CheckStatus::Warn;
        result.message = "no signing_key; signed URLs will not survive a restart".to_string();
    }
    result
}

async fn check_auth(config: &PromptdeckConfig) -> CheckResult {
    let start = Instant::now();
    let Some(url) = config.auth.provider_url.as_deref() else {
        let (status, message) = if config.server.bearer_token.is_some() {
            (CheckStatus::Pass, "bearer token only".to_string())
        } else {
            (
                CheckStatus::Warn,
                "no bearer token and no auth provider; API requests will be rejected".to_string(),
            )
        };
        return CheckResult {
            name: "Auth".to_string(),
            status,
            message,
            duration: start.elapsed(),
        };
    };

    let health = match HttpAuthProvider::new(url, config.auth.api_key.as_deref()) {
        Ok(provider) => provider.health_check().await,
        Err(e) => Err(e),
    };
    CheckResult::from_health("Auth", health, start)
}
