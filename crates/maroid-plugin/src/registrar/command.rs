// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use maroid_core::{CapabilityKind, MaroidError, Plugin};

use super::{Registrar, not_supported, retrieval};
use crate::registries::{LoadedPlugin, Registries};
use crate::registry::PluginCommandGroup;

/// Nests a plugin's CLI commands under a group named after the plugin.
pub struct CommandRegistrar;

impl Registrar for CommandRegistrar {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Command
    }

    fn supports(&self, plugin: &dyn Plugin) -> bool {
        plugin.as_command_provider().is_some()
    }

    fn register(&self, plugin: &LoadedPlugin, registries: &mut Registries) -> Result<(), MaroidError> {
        let provider = plugin
            .instance
            .as_command_provider()
            .ok_or_else(|| not_supported(self.kind()))?;
        let commands = provider.commands().map_err(retrieval(self.kind()))?;

        let group = PluginCommandGroup::new(&plugin.id, &plugin.meta.version, commands);
        let mut names: Vec<String> = Vec::with_capacity(group.commands.len());
        for cmd in &group.commands {
            let name = cmd.command().get_name().to_string();
            if names.contains(&name) {
                return Err(MaroidError::AlreadyRegistered {
                    kind: self.kind(),
                    key: format!("{} {name}", group.name),
                });
            }
            names.push(name);
        }

        registries.commands.register(group.name.clone(), group)
    }
}
