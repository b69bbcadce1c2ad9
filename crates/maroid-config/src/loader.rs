// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/maroid/maroid.toml` < `~/.config/maroid/maroid.toml`
//! < `./maroid.toml`, with `MAROID_*` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MaroidConfig;

/// Config file name looked up in every hierarchy directory.
pub const CONFIG_FILE_NAME: &str = "maroid.toml";

/// Sections that environment variables may target.
const ENV_SECTIONS: &[&str] = &["log", "database", "mqtt", "worker", "chat"];

/// Files consulted when no explicit path is given, lowest precedence first.
pub fn config_file_hierarchy() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/maroid").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("maroid").join(CONFIG_FILE_NAME));
    }
    files.push(PathBuf::from(CONFIG_FILE_NAME));
    files
}

/// Build the Figment for the given explicit file, or for the standard
/// hierarchy when `path` is `None`.
pub fn build_figment(path: Option<&Path>) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(MaroidConfig::default()));
    match path {
        Some(path) => figment = figment.merge(Toml::file(path)),
        None => {
            for file in config_file_hierarchy() {
                figment = figment.merge(Toml::file(file));
            }
        }
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<MaroidConfig, figment::Error> {
    build_figment(None).extract()
}

/// Load configuration from one file with env var overrides. The file
/// replaces the hierarchy rather than layering on top of it.
pub fn load_config_from_path(path: &Path) -> Result<MaroidConfig, figment::Error> {
    build_figment(Some(path)).extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MaroidConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MaroidConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Environment provider mapping `MAROID_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `MAROID_WORKER_SHUTDOWN_TIMEOUT_SECS` maps to `worker.shutdown_timeout_secs`.
/// Variables naming no known section are ignored.
fn env_provider() -> Env {
    Env::prefixed("MAROID_")
        .filter(|key| env_key_path(key.as_str()).is_some())
        .map(|key| {
            env_key_path(key.as_str())
                .unwrap_or_else(|| key.as_str().to_ascii_lowercase())
                .into()
        })
}

/// Maps a prefix-stripped variable name to its dotted config path.
fn env_key_path(key: &str) -> Option<String> {
    let key = key.to_ascii_lowercase();
    ENV_SECTIONS.iter().find_map(|&section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|field| !field.is_empty())
            .map(|field| format!("{section}.{field}"))
    })
}
