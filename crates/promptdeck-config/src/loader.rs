// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./promptdeck.toml` > `~/.config/promptdeck/promptdeck.toml` > `/etc/promptdeck/promptdeck.toml`
//! with environment variable overrides via `PROMPTDECK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PromptdeckConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/promptdeck/promptdeck.toml` (system-wide)
/// 3. `~/.config/promptdeck/promptdeck.toml` (user XDG config)
/// 4. `./promptdeck.toml` (local directory)
/// 5. `PROMPTDECK_*` environment variables
pub fn load_config() -> Result<PromptdeckConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no XDG lookup, no env).
///
/// Used by tests and by [`crate::load_and_validate_str`].
pub fn load_config_from_str(toml_content: &str) -> Result<PromptdeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PromptdeckConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PromptdeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PromptdeckConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config files in merge order, lowest precedence first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/promptdeck/promptdeck.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("promptdeck/promptdeck.toml"));
    }
    paths.push(PathBuf::from("promptdeck.toml"));
    paths
}

/// Build the Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    search_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(PromptdeckConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PROMPTDECK_OBJECTS_URL_TTL_SECS` must map to
/// `objects.url_ttl_secs`, not `objects.url.ttl.secs`.
fn env_provider() -> Env {
    // `key` arrives with the prefix stripped but its case intact:
    // PROMPTDECK_SERVER_BEARER_TOKEN -> "SERVER_BEARER_TOKEN".
    Env::prefixed("PROMPTDECK_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env key, in any case, onto its dotted config path.
pub fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    const SECTIONS: [&str; 7] = [
        "app", "server", "storage", "objects", "uploads", "gallery", "auth",
    ];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
