// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use maroid_core::{CapabilityKind, ChatCommand, MaroidError, Plugin};

use super::{Registrar, not_supported, retrieval};
use crate::registries::{LoadedPlugin, Registries};
use crate::registry::NamespacedChatCommand;

/// Registers a plugin's chat commands with plugin-prefixed tokens.
pub struct ChatCommandRegistrar;

impl Registrar for ChatCommandRegistrar {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ChatCommand
    }

    fn supports(&self, plugin: &dyn Plugin) -> bool {
        plugin.as_chat_command_provider().is_some()
    }

    fn register(&self, plugin: &LoadedPlugin, registries: &mut Registries) -> Result<(), MaroidError> {
        let provider = plugin
            .instance
            .as_chat_command_provider()
            .ok_or_else(|| not_supported(self.kind()))?;
        let commands = provider.chat_commands().map_err(retrieval(self.kind()))?;

        registries
            .chat_commands
            .register_all(commands.into_iter().map(|cmd| {
                let wrapped: Arc<dyn ChatCommand> =
                    Arc::new(NamespacedChatCommand::new(&plugin.id, cmd));
                (wrapped.meta().command, wrapped)
            }))
    }
}
