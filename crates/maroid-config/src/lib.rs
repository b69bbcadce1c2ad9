// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Maroid hub.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `MAROID_*` environment variable overrides, and
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use maroid_config::load_and_validate;
//!
//! let config = load_and_validate(None).expect("config errors");
//! println!("plugins: {}", config.plugins.len());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    BrokerEndpoint, ChatConfig, ConversationStoreKind, DatabaseConfig, LogConfig, MaroidConfig,
    MqttConfig, PluginEntry, WorkerConfig,
};

/// Load configuration and validate it.
///
/// With `path` set, only that file (plus env overrides) is read and it must
/// exist; otherwise the standard hierarchy is used. Figment errors are
/// converted to diagnostics carrying source spans where the offending file can
/// be found.
pub fn load_and_validate(path: Option<&Path>) -> Result<MaroidConfig, Vec<ConfigError>> {
    if let Some(path) = path {
        if !path.is_file() {
            return Err(vec![ConfigError::Other(format!(
                "config file {} does not exist",
                path.display()
            ))]);
        }
    }
    match loader::build_figment(path).extract::<MaroidConfig>() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources(path);
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<MaroidConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Reads the config files that may have contributed, keyed by the path
/// string figment reports in error metadata.
fn collect_toml_sources(path: Option<&Path>) -> Vec<(String, String)> {
    let files = match path {
        Some(path) => vec![path.to_path_buf()],
        None => loader::config_file_hierarchy(),
    };

    files
        .into_iter()
        .filter_map(|file| {
            let content = std::fs::read_to_string(&file).ok()?;
            let absolute = if file.is_absolute() {
                file
            } else {
                std::env::current_dir().map(|d| d.join(&file)).unwrap_or(file)
            };
            Some((absolute.display().to_string(), content))
        })
        .collect()
}
