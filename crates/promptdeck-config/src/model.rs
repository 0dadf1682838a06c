// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Promptdeck service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Promptdeck configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptdeckConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Card table (SQLite) settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Image bucket settings.
    #[serde(default)]
    pub objects: ObjectsConfig,

    /// Upload validation limits.
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Listing and pagination settings.
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Magic-link authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name of the service.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "promptdeck".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Static bearer token accepted on API routes. `None` disables bearer auth.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Externally reachable base URL, used when minting signed object URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[redacted]"))
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

/// Card table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("promptdeck").join("promptdeck.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("promptdeck.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Image bucket configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectsConfig {
    /// Directory holding the bucket's `Output/` and `Reference/` folders.
    #[serde(default = "default_objects_root")]
    pub root_dir: String,

    /// Bucket name, reported in health output and logs.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// HMAC key for signed read URLs. A random key is generated per process when unset.
    #[serde(default)]
    pub signing_key: Option<String>,

    /// Lifetime of signed read URLs in seconds.
    #[serde(default = "default_url_ttl_secs")]
    pub url_ttl_secs: u64,
}

impl std::fmt::Debug for ObjectsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectsConfig")
            .field("root_dir", &self.root_dir)
            .field("bucket", &self.bucket)
            .field("signing_key", &self.signing_key.as_ref().map(|_| "[redacted]"))
            .field("url_ttl_secs", &self.url_ttl_secs)
            .finish()
    }
}

impl Default for ObjectsConfig {
    fn default() -> Self {
        Self {
            root_dir: default_objects_root(),
            bucket: default_bucket(),
            signing_key: None,
            url_ttl_secs: default_url_ttl_secs(),
        }
    }
}

fn default_objects_root() -> String {
    dirs::data_dir()
        .map(|p| p.join("promptdeck").join("objects"))
        .unwrap_or_else(|| std::path::PathBuf::from("objects"))
        .to_string_lossy()
        .into_owned()
}

fn default_bucket() -> String {
    "prompt-library".to_string()
}

fn default_url_ttl_secs() -> u64 {
    3600
}

/// Upload validation limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadsConfig {
    /// Maximum accepted image size in MiB.
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
        }
    }
}

fn default_max_size_mb() -> u64 {
    50
}

/// Listing and pagination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryConfig {
    /// Page size used when a request omits `pageSize`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound applied to requested page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    200
}

/// Magic-link authentication configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Base URL of the hosted auth provider. `None` disables session login.
    #[serde(default)]
    pub provider_url: Option<String>,

    /// Project API key sent to the auth provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Organisational email domain; every other domain is signed out.
    #[serde(default = "default_allowed_email_domain")]
    pub allowed_email_domain: String,

    /// Name of the session cookie set after a successful callback.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Upper bound on how long a registered session is honoured.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("provider_url", &self.provider_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("allowed_email_domain", &self.allowed_email_domain)
            .field("session_cookie", &self.session_cookie)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider_url: None,
            api_key: None,
            allowed_email_domain: default_allowed_email_domain(),
            session_cookie: default_session_cookie(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_allowed_email_domain() -> String {
    "shopos.ai".to_string()
}

fn default_session_cookie() -> String {
    "promptdeck_session".to_string()
}

fn default_session_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PromptdeckConfig::default();
        assert_eq!(config.app.name, "promptdeck");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.objects.bucket, "prompt-library");
        assert_eq!(config.objects.url_ttl_secs, 3600);
        assert_eq!(config.uploads.max_size_mb, 50);
        assert_eq!(config.gallery.default_page_size, 50);
        assert_eq!(config.auth.allowed_email_domain, "shopos.ai");
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = PromptdeckConfig::default();
        config.server.bearer_token = Some("tok-123".into());
        config.objects.signing_key = Some("key-456".into());
        config.auth.api_key = Some("api-789".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("tok-123"));
        assert!(!debug.contains("key-456"));
        assert!(!debug.contains("api-789"));
    }
}
