// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and page size bounds.

use crate::diagnostic::ConfigError;
use crate::model::PromptdeckConfig;

/// Minimum length of an explicitly configured URL signing key.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PromptdeckConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::invalid("server.host", "must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::invalid(
                "server.host",
                format!("`{host}` is not a valid IP address or hostname"),
            ));
        }
    }

    if config
        .server
        .bearer_token
        .as_deref()
        .is_some_and(|token| token.trim().is_empty())
    {
        errors.push(ConfigError::invalid(
            "server.bearer_token",
            "must not be empty when set",
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::invalid("storage.database_path", "must not be empty"));
    }
    if config.objects.root_dir.trim().is_empty() {
        errors.push(ConfigError::invalid("objects.root_dir", "must not be empty"));
    }
    if config.objects.url_ttl_secs == 0 {
        errors.push(ConfigError::invalid("objects.url_ttl_secs", "must be at least 1"));
    }
    if let Some(key) = config
        .objects
        .signing_key
        .as_deref()
        .filter(|key| key.len() < MIN_SIGNING_KEY_LEN)
    {
        errors.push(ConfigError::invalid(
            "objects.signing_key",
            format!(
                "must be at least {MIN_SIGNING_KEY_LEN} bytes, got {}",
                key.len()
            ),
        ));
    }
    if config.uploads.max_size_mb == 0 {
        errors.push(ConfigError::invalid("uploads.max_size_mb", "must be at least 1"));
    }

    let gallery = &config.gallery;
    if gallery.default_page_size == 0 {
        errors.push(ConfigError::invalid(
            "gallery.default_page_size",
            "must be at least 1",
        ));
    } else if gallery.default_page_size > gallery.max_page_size {
        errors.push(ConfigError::invalid(
            "gallery.default_page_size",
            format!(
                "({}) must not exceed gallery.max_page_size ({})",
                gallery.default_page_size, gallery.max_page_size
            ),
        ));
    }

    let domain = config.auth.allowed_email_domain.trim();
    if domain.is_empty() {
        errors.push(ConfigError::invalid(
            "auth.allowed_email_domain",
            "must not be empty",
        ));
    } else if domain.contains('@') {
        errors.push(ConfigError::invalid(
            "auth.allowed_email_domain",
            format!("`{domain}` must be a bare domain without `@`"),
        ));
    }
    if config.auth.session_cookie.trim().is_empty() {
        errors.push(ConfigError::invalid("auth.session_cookie", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &PromptdeckConfig) -> Vec<String> {
        match validate_config(config) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PromptdeckConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = PromptdeckConfig::default();
        config.server.host = "  ".into();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("server.host"));
    }

    #[test]
    fn host_with_invalid_characters_is_rejected() {
        let mut config = PromptdeckConfig::default();
        config.server.host = "local host!".into();
        assert!(messages(&config)[0].contains("not a valid IP address"));
    }

    #[test]
    fn hostname_and_ipv6_are_accepted() {
        let mut config = PromptdeckConfig::default();
        config.server.host = "gallery.internal".into();
        assert!(validate_config(&config).is_ok());
        config.server.host = "::1".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn short_signing_key_is_rejected() {
        let mut config = PromptdeckConfig::default();
        config.objects.signing_key = Some("too-short".into());
        assert!(messages(&config)[0].contains("objects.signing_key"));

        config.objects.signing_key = Some("k".repeat(MIN_SIGNING_KEY_LEN));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn page_size_bounds_are_checked() {
        let mut config = PromptdeckConfig::default();
        config.gallery.default_page_size = 500;
        config.gallery.max_page_size = 100;
        assert!(messages(&config)[0].contains("must not exceed"));

        config.gallery.default_page_size = 0;
        assert!(messages(&config)[0].contains("at least 1"));
    }

    #[test]
    fn email_domain_must_be_bare() {
        let mut config = PromptdeckConfig::default();
        config.auth.allowed_email_domain = "@shopos.ai".into();
        assert!(messages(&config)[0].contains("without `@`"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = PromptdeckConfig::default();
        config.server.host = String::new();
        config.storage.database_path = String::new();
        config.uploads.max_size_mb = 0;
        config.objects.url_ttl_secs = 0;
        config.server.bearer_token = Some(String::new());
        assert_eq!(messages(&config).len(), 5);
    }
}
