// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing inbound chat updates.

use std::sync::Arc;

use maroid_core::{ChatCommandScope, ChatUpdate, ConversationEngine, MaroidError};
use maroid_plugin::Registries;
use tracing::{debug, info};

use crate::command::parse_command;

/// What [`ChatRouter::dispatch`] did with an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Handled by the chat command with this token.
    Command(String),
    /// Passed to the conversation engine.
    Conversation,
    /// Addressed to another bot, or plain text with no engine attached.
    Ignored,
}

/// Chat commands sharing one advertised audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScopeGroup {
    pub scope: ChatCommandScope,
    /// `(command, description)` pairs in registration order.
    pub commands: Vec<(String, String)>,
}

/// Sends slash commands to the chat-command registry and plain messages to
/// the conversation engine.
pub struct ChatRouter {
    registries: Arc<Registries>,
    conversations: Option<Arc<dyn ConversationEngine>>,
    bot_username: Option<String>,
}

impl ChatRouter {
    pub fn new(registries: Arc<Registries>) -> Self {
        Self {
            registries,
            conversations: None,
            bot_username: None,
        }
    }

    pub fn with_conversations(mut self, engine: Arc<dyn ConversationEngine>) -> Self {
        self.conversations = Some(engine);
        self
    }

    /// Commands mentioning another bot (`/cmd@other_bot`) are ignored.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    pub async fn dispatch(&self, update: &ChatUpdate) -> Result<Routed, MaroidError> {
        let Some(parsed) = parse_command(update.text()) else {
            return match &self.conversations {
                Some(engine) => {
                    engine.handle_message(update).await?;
                    Ok(Routed::Conversation)
                }
                None => Ok(Routed::Ignored),
            };
        };

        if let (Some(mention), Some(own)) = (parsed.mention, &self.bot_username) {
            if !mention.eq_ignore_ascii_case(own) {
                debug!(command = parsed.command, mention, "command addressed to another bot");
                return Ok(Routed::Ignored);
            }
        }

        let command = self
            .registries
            .chat_commands
            .get(parsed.command)
            .ok_or_else(|| MaroidError::UnknownChatCommand(parsed.command.to_string()))?;

        info!(command = parsed.command, user_id = update.user_id, "handling chat command");
        command.validate(update).map_err(|e| MaroidError::Plugin {
            message: format!("chat command /{} validation failed", parsed.command),
            source: Some(Box::new(e)),
        })?;
        command.handle(update).await.map_err(|e| MaroidError::Plugin {
            message: format!("chat command /{} failed", parsed.command),
            source: Some(Box::new(e)),
        })?;

        Ok(Routed::Command(parsed.command.to_string()))
    }

    /// Registered commands grouped by scope, in first-seen scope order, ready
    /// to be published to the bot's command menu.
    pub fn command_menu(&self) -> Vec<CommandScopeGroup> {
        let mut groups: Vec<CommandScopeGroup> = Vec::new();
        for command in self.registries.chat_commands.values() {
            let meta = command.meta();
            let entry = (meta.command, meta.description);
            match groups.iter_mut().find(|g| g.scope == meta.scope) {
                Some(group) => group.commands.push(entry),
                None => groups.push(CommandScopeGroup {
                    scope: meta.scope,
                    commands: vec![entry],
                }),
            }
        }
        groups
    }
}
