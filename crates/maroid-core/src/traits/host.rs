// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The host surface handed to plugin constructors.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::MaroidError;
use crate::traits::chat::ChatBot;
use crate::traits::conversation::ConversationEngine;

/// A file attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

/// A notification message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Sends notifications to named logical channels.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, channel: &str, notification: Notification) -> Result<(), MaroidError>;

    fn channels(&self) -> Vec<String>;
}

/// Services the host application offers to plugins.
///
/// Only [`Host::dispatch`] is guaranteed. Everything else may be absent in a
/// given process and reports [`MaroidError::Unavailable`] by default; plugins
/// should ask for a service when they need it rather than at construction.
#[async_trait]
pub trait Host: Send + Sync {
    /// The host's tracing dispatcher. A dynamically loaded plugin has its own
    /// copy of `tracing`'s globals and must enter this dispatcher (for example
    /// with `tracing::dispatcher::with_default`) to emit into the host's logs.
    fn dispatch(&self) -> tracing::Dispatch;

    /// The shared database handle, connected on first use.
    async fn database(&self) -> Result<Arc<Database>, MaroidError> {
        Err(MaroidError::Unavailable("database"))
    }

    fn notifier(&self) -> Result<Arc<dyn Notifier>, MaroidError> {
        Err(MaroidError::Unavailable("notifier"))
    }

    fn chat_bot(&self) -> Result<Arc<dyn ChatBot>, MaroidError> {
        Err(MaroidError::Unavailable("chat bot"))
    }

    async fn conversation_engine(&self) -> Result<Arc<dyn ConversationEngine>, MaroidError> {
        Err(MaroidError::Unavailable("conversation engine"))
    }
}
