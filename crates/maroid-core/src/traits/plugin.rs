// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The base plugin trait.

use crate::traits::{
    ChatCommandProvider, ChatConversationProvider, CommandProvider, CronProvider,
    MigrationProvider, TopicSubscriberProvider,
};
use crate::types::PluginMetadata;

/// Base trait implemented by every plugin.
///
/// Each `as_*_provider` accessor is the capability check a registrar performs.
/// A plugin that contributes, say, cron jobs overrides `as_cron_provider` to
/// return `Some(self)`; everything it does not override stays `None`.
pub trait Plugin: Send + Sync {
    /// Identity, version and API version of the plugin.
    fn meta(&self) -> PluginMetadata;

    fn as_command_provider(&self) -> Option<&dyn CommandProvider> {
        None
    }

    fn as_cron_provider(&self) -> Option<&dyn CronProvider> {
        None
    }

    fn as_migration_provider(&self) -> Option<&dyn MigrationProvider> {
        None
    }

    fn as_chat_command_provider(&self) -> Option<&dyn ChatCommandProvider> {
        None
    }

    fn as_chat_conversation_provider(&self) -> Option<&dyn ChatConversationProvider> {
        None
    }

    fn as_topic_subscriber_provider(&self) -> Option<&dyn TopicSubscriberProvider> {
        None
    }
}
