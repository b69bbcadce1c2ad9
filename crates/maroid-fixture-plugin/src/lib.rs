// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A plugin library exporting one migration, loaded by the loader tests.
//!
//! Config keys:
//! - `table`: name of the table its migration creates (default `fixture_readings`)
//! - `fail`: when true the constructor refuses to build the plugin

use std::sync::Arc;

use maroid_core::declaration::{PluginConfigMap, decode_config};
use maroid_core::{
    Host, MaroidError, MigrationFile, MigrationProvider, MigrationSource, Plugin, PluginMetadata,
};
use serde::Deserialize;

const PLUGIN_ID: &str = "dev.maroid.fixture";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureConfig {
    #[serde(default = "default_table")]
    table: String,
    #[serde(default)]
    fail: bool,
}

fn default_table() -> String {
    "fixture_readings".to_string()
}

struct FixturePlugin {
    table: String,
}

impl Plugin for FixturePlugin {
    fn meta(&self) -> PluginMetadata {
        PluginMetadata::new(PLUGIN_ID, env!("CARGO_PKG_VERSION"))
    }

    fn as_migration_provider(&self) -> Option<&dyn MigrationProvider> {
        Some(self)
    }
}

impl MigrationProvider for FixturePlugin {
    fn migrations(&self) -> Result<MigrationSource, MaroidError> {
        Ok(MigrationSource::Embedded(vec![MigrationFile::new(
            "V1__init",
            format!("CREATE TABLE {} (id SERIAL PRIMARY KEY);", self.table),
        )]))
    }
}

fn new(_host: Arc<dyn Host>, config: PluginConfigMap) -> Result<Box<dyn Plugin>, MaroidError> {
    let config: FixtureConfig = decode_config(&config)?;
    if config.fail {
        return Err(MaroidError::plugin("fixture asked to fail"));
    }
    Ok(Box::new(FixturePlugin {
        table: config.table,
    }))
}

maroid_core::export_plugin!(new);
