// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use maroid_core::{CapabilityKind, MaroidError, Plugin};

use super::{Registrar, not_supported, retrieval};
use crate::registries::{LoadedPlugin, Registries};

/// Registers a plugin's migration source under the plugin's canonical ID.
pub struct MigrationRegistrar;

impl Registrar for MigrationRegistrar {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Migration
    }

    fn supports(&self, plugin: &dyn Plugin) -> bool {
        plugin.as_migration_provider().is_some()
    }

    fn register(&self, plugin: &LoadedPlugin, registries: &mut Registries) -> Result<(), MaroidError> {
        let provider = plugin
            .instance
            .as_migration_provider()
            .ok_or_else(|| not_supported(self.kind()))?;
        let source = provider.migrations().map_err(retrieval(self.kind()))?;

        registries
            .migrations
            .register(plugin.id.to_string(), source)
    }
}
