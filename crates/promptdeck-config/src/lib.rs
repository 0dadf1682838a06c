// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the promptdeck gallery service.
//!
//! `promptdeck.toml` is merged from `/etc`, the user config directory and the
//! working directory, then overridden by `PROMPTDECK_*` variables. Unknown
//! keys are rejected, and every problem found is returned at once as a miette
//! diagnostic.
//!
//! ```no_run
//! let config = promptdeck_config::load_and_validate().expect("config errors");
//! println!("gallery on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PromptdeckConfig;

/// Load from the file hierarchy plus environment, then validate.
pub fn load_and_validate() -> Result<PromptdeckConfig, Vec<ConfigError>> {
    checked(loader::load_config(), hierarchy_sources)
}

/// Load from one explicit file plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<PromptdeckConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load from an inline TOML document (no files, no environment), then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<PromptdeckConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a loaded config, or turn the load error into diagnostics.
///
/// File contents are only read when there is an error to point into.
fn checked(
    loaded: Result<PromptdeckConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PromptdeckConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn hierarchy_sources() -> Vec<(String, String)> {
    loader::search_paths()
        .iter()
        .filter_map(|path| read_source(path))
        .collect()
}

/// Read a config file keyed by the absolute path figment reports for it.
fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Some((absolute.display().to_string(), content))
}
