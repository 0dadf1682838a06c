// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics rendered through miette.
//!
//! Figment reports problems as a flat list keyed by path. This module turns
//! them into [`ConfigError`]s that point back at the offending line of
//! `promptdeck.toml` and, for misspelled keys, name the closest valid key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::io::IsTerminal;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key needs before it is offered as a fix.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A single problem found while loading `promptdeck.toml`.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {}", table_name(.section.as_deref()))]
    #[diagnostic(
        code(promptdeck::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Table the key appeared in; `None` at the top level.
        section: Option<String>,
        suggestion: Option<String>,
        /// Comma-separated keys accepted by the table.
        valid_keys: String,
        #[label("not recognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(
        code(promptdeck::config::invalid_type),
        help("`{key}` takes {expected}")
    )]
    InvalidType {
        /// Dotted path, e.g. `server.port`.
        key: String,
        found: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(promptdeck::config::missing_key),
        help("add `{key} = <value>` to promptdeck.toml")
    )]
    MissingKey { key: String },

    /// A value parsed but is out of range for the gallery.
    #[error("`{key}` {message}")]
    #[diagnostic(code(promptdeck::config::invalid_value), help("{}", override_help(key)))]
    Invalid {
        /// Dotted path, e.g. `gallery.default_page_size`.
        key: &'static str,
        message: String,
    },

    #[error("configuration error: {0}")]
    #[diagnostic(code(promptdeck::config::other))]
    Other(String),
}

impl ConfigError {
    /// An out-of-range value at `key`.
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

fn table_name(section: Option<&str>) -> String {
    match section {
        Some(section) => format!("[{section}]"),
        None => "the top level".to_string(),
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Points at both places a value can come from: the TOML table and the
/// `PROMPTDECK_` environment variable that overrides it.
fn override_help(key: &str) -> String {
    let env = format!("PROMPTDECK_{}", key.replace('.', "_").to_uppercase());
    match key.split_once('.') {
        Some((section, field)) => {
            format!("fix `{field}` under [{section}] in promptdeck.toml, or check `{env}`")
        }
        None => format!("fix `{key}` in promptdeck.toml, or check `{env}`"),
    }
}

/// Convert a figment error (possibly holding several) into diagnostics.
///
/// `toml_sources` pairs each config file path with its contents so spans can
/// be attached to errors that came from a file.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(ToString::to_string).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    // The path ends with the unknown field; the table is what precedes it.
                    let section = match path.split_last() {
                        Some((last, section)) if last == field => section,
                        _ => path.as_slice(),
                    };
                    let (span, src) = locate(&error, section, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: (!section.is_empty()).then(|| section.join(".")),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                Kind::InvalidType(found, expected) => {
                    // The path ends with the field itself.
                    let (span, src) = match path.split_last() {
                        Some((field, section)) => locate(&error, section, field, toml_sources),
                        None => (None, None),
                    };
                    ConfigError::InvalidType {
                        key: path.join("."),
                        found: found.to_string(),
                        expected: expected.clone(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Attach a span when the error came from one of the known TOML files.
fn locate(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(file)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let file = file.display().to_string();

    toml_sources
        .iter()
        .find(|(path, _)| *path == file)
        .and_then(|(path, content)| {
            let offset = find_key_offset(content, section, field)?;
            Some((
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            ))
        })
        .unwrap_or((None, None))
}

/// Byte offset of `field` inside the `[section]` table of `content`.
///
/// An empty `section` means the top level, before any table header. Dotted
/// tables such as `[a.b]` match a section of `["a", "b"]`.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let wanted = section.join(".");
    let mut table = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            table = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            continue;
        }
        if table != wanted {
            continue;
        }

        let Some(rest) = trimmed.strip_prefix(field) else {
            continue;
        };
        if rest.trim_start().starts_with('=') {
            return Some(start + (line.len() - trimmed.len()));
        }
    }

    None
}

/// The valid key closest to `unknown`, if any scores above the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr, without color when stderr is not a terminal.
pub fn render_errors(errors: &[ConfigError]) {
    let theme = if std::io::stderr().is_terminal() {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);

    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }

    let noun = if errors.len() == 1 { "error" } else { "errors" };
    eprintln!("promptdeck.toml: {} {noun}", errors.len());
}
