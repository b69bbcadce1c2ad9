// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-bot command capability and the bot client surface exposed to plugins.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MaroidError;

/// An inbound chat update as seen by commands and conversation steps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatUpdate {
    pub update_id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ChatUpdate {
    /// Message text, or the empty string for updates without text.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Audience a chat command is advertised to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatCommandScope {
    #[default]
    Default,
    AllPrivateChats,
    AllGroupChats,
    AllChatAdministrators,
    Chat { chat_id: i64 },
}

/// Metadata for a chat command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCommandMeta {
    /// Command token without the leading slash.
    pub command: String,
    pub description: String,
    #[serde(default)]
    pub scope: ChatCommandScope,
}

/// A slash command handled by a plugin.
#[async_trait]
pub trait ChatCommand: Send + Sync {
    fn meta(&self) -> ChatCommandMeta;

    /// Checks whether the update is acceptable for this command.
    fn validate(&self, _update: &ChatUpdate) -> Result<(), MaroidError> {
        Ok(())
    }

    async fn handle(&self, update: &ChatUpdate) -> Result<(), MaroidError>;
}

/// Capability: the plugin contributes chat commands.
pub trait ChatCommandProvider: Send + Sync {
    fn chat_commands(&self) -> Result<Vec<Arc<dyn ChatCommand>>, MaroidError>;
}

/// Outbound side of the chat-bot client.
#[async_trait]
pub trait ChatBot: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), MaroidError>;
}
