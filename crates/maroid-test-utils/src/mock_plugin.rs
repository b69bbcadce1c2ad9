// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder-configured mock plugin.

use std::sync::Arc;

use maroid_core::{
    CapabilityKind, ChatCommand, ChatCommandProvider, ChatConversationProvider, CommandProvider,
    Conversation, CronJob, CronProvider, MaroidError, MigrationProvider, MigrationSource, Plugin,
    PluginCommand, PluginMetadata, TopicSubscriber, TopicSubscriberProvider,
};

/// A plugin whose capabilities are chosen by the test.
///
/// A capability is offered once any value for it is added (an empty list
/// counts). [`MockPlugin::failing`] makes the retrieval of one capability
/// return an error.
#[derive(Clone)]
pub struct MockPlugin {
    meta: PluginMetadata,
    commands: Option<Vec<Arc<dyn PluginCommand>>>,
    cron_jobs: Option<Vec<Arc<dyn CronJob>>>,
    migrations: Option<MigrationSource>,
    chat_commands: Option<Vec<Arc<dyn ChatCommand>>>,
    conversations: Option<Vec<Arc<dyn Conversation>>>,
    subscribers: Option<Vec<Arc<dyn TopicSubscriber>>>,
    failing: Option<CapabilityKind>,
}

impl MockPlugin {
    pub fn new(id: &str) -> Self {
        Self::with_meta(PluginMetadata::new(id, "0.1.0"))
    }

    pub fn with_meta(meta: PluginMetadata) -> Self {
        Self {
            meta,
            commands: None,
            cron_jobs: None,
            migrations: None,
            chat_commands: None,
            conversations: None,
            subscribers: None,
            failing: None,
        }
    }

    pub fn command(mut self, command: Arc<dyn PluginCommand>) -> Self {
        self.commands.get_or_insert_with(Vec::new).push(command);
        self
    }

    pub fn cron_job(mut self, job: Arc<dyn CronJob>) -> Self {
        self.cron_jobs.get_or_insert_with(Vec::new).push(job);
        self
    }

    pub fn migrations(mut self, source: MigrationSource) -> Self {
        self.migrations = Some(source);
        self
    }

    pub fn chat_command(mut self, command: Arc<dyn ChatCommand>) -> Self {
        self.chat_commands.get_or_insert_with(Vec::new).push(command);
        self
    }

    pub fn conversation(mut self, conversation: Arc<dyn Conversation>) -> Self {
        self.conversations
            .get_or_insert_with(Vec::new)
            .push(conversation);
        self
    }

    pub fn subscriber(mut self, subscriber: Arc<dyn TopicSubscriber>) -> Self {
        self.subscribers.get_or_insert_with(Vec::new).push(subscriber);
        self
    }

    /// Offers `kind` but fails to hand over its contributions.
    pub fn failing(mut self, kind: CapabilityKind) -> Self {
        self.failing = Some(kind);
        match kind {
            CapabilityKind::Command => {
                self.commands.get_or_insert_with(Vec::new);
            }
            CapabilityKind::Cron => {
                self.cron_jobs.get_or_insert_with(Vec::new);
            }
            CapabilityKind::Migration => {
                self.migrations
                    .get_or_insert_with(|| MigrationSource::Embedded(Vec::new()));
            }
            CapabilityKind::ChatCommand => {
                self.chat_commands.get_or_insert_with(Vec::new);
            }
            CapabilityKind::ChatConversation => {
                self.conversations.get_or_insert_with(Vec::new);
            }
            CapabilityKind::TopicSubscriber => {
                self.subscribers.get_or_insert_with(Vec::new);
            }
        }
        self
    }

    pub fn into_arc(self) -> Arc<dyn Plugin> {
        Arc::new(self)
    }

    fn hand_over<T: Clone>(&self, kind: CapabilityKind, value: &Option<T>) -> Result<T, MaroidError> {
        if self.failing == Some(kind) {
            return Err(MaroidError::plugin(format!("{kind} unavailable")));
        }
        value
            .clone()
            .ok_or_else(|| MaroidError::Internal(format!("{kind} not configured")))
    }
}

impl Plugin for MockPlugin {
    fn meta(&self) -> PluginMetadata {
        self.meta.clone()
    }

    fn as_command_provider(&self) -> Option<&dyn CommandProvider> {
        self.commands.as_ref().map(|_| self as &dyn CommandProvider)
    }

    fn as_cron_provider(&self) -> Option<&dyn CronProvider> {
        self.cron_jobs.as_ref().map(|_| self as &dyn CronProvider)
    }

    fn as_migration_provider(&self) -> Option<&dyn MigrationProvider> {
        self.migrations.as_ref().map(|_| self as &dyn MigrationProvider)
    }

    fn as_chat_command_provider(&self) -> Option<&dyn ChatCommandProvider> {
        self.chat_commands
            .as_ref()
            .map(|_| self as &dyn ChatCommandProvider)
    }

    fn as_chat_conversation_provider(&self) -> Option<&dyn ChatConversationProvider> {
        self.conversations
            .as_ref()
            .map(|_| self as &dyn ChatConversationProvider)
    }

    fn as_topic_subscriber_provider(&self) -> Option<&dyn TopicSubscriberProvider> {
        self.subscribers
            .as_ref()
            .map(|_| self as &dyn TopicSubscriberProvider)
    }
}

impl CommandProvider for MockPlugin {
    fn commands(&self) -> Result<Vec<Arc<dyn PluginCommand>>, MaroidError> {
        self.hand_over(CapabilityKind::Command, &self.commands)
    }
}

impl CronProvider for MockPlugin {
    fn cron_jobs(&self) -> Result<Vec<Arc<dyn CronJob>>, MaroidError> {
        self.hand_over(CapabilityKind::Cron, &self.cron_jobs)
    }
}

impl MigrationProvider for MockPlugin {
    fn migrations(&self) -> Result<MigrationSource, MaroidError> {
        self.hand_over(CapabilityKind::Migration, &self.migrations)
    }
}

impl ChatCommandProvider for MockPlugin {
    fn chat_commands(&self) -> Result<Vec<Arc<dyn ChatCommand>>, MaroidError> {
        self.hand_over(CapabilityKind::ChatCommand, &self.chat_commands)
    }
}

impl ChatConversationProvider for MockPlugin {
    fn chat_conversations(&self) -> Result<Vec<Arc<dyn Conversation>>, MaroidError> {
        self.hand_over(CapabilityKind::ChatConversation, &self.conversations)
    }
}

impl TopicSubscriberProvider for MockPlugin {
    fn topic_subscribers(&self) -> Result<Vec<Arc<dyn TopicSubscriber>>, MaroidError> {
        self.hand_over(CapabilityKind::TopicSubscriber, &self.subscribers)
    }
}
