// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use maroid_core::{CapabilityKind, MaroidError, Plugin};

use super::{Registrar, not_supported, retrieval};
use crate::registries::{LoadedPlugin, Registries};
use crate::registry::RegisteredConversation;

/// Registers a plugin's conversations and indexes their steps.
pub struct ChatConversationRegistrar;

impl Registrar for ChatConversationRegistrar {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ChatConversation
    }

    fn supports(&self, plugin: &dyn Plugin) -> bool {
        plugin.as_chat_conversation_provider().is_some()
    }

    fn register(&self, plugin: &LoadedPlugin, registries: &mut Registries) -> Result<(), MaroidError> {
        let provider = plugin
            .instance
            .as_chat_conversation_provider()
            .ok_or_else(|| not_supported(self.kind()))?;
        let conversations = provider
            .chat_conversations()
            .map_err(retrieval(self.kind()))?;

        let entries = conversations
            .into_iter()
            .map(|conversation| {
                let id = conversation.id();
                RegisteredConversation::new(&plugin.id, conversation).map(|entry| (id, entry))
            })
            .collect::<Result<Vec<_>, _>>()?;

        registries.chat_conversations.register_all(entries)
    }
}
