// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin and capability trait definitions.
//!
//! A plugin implements [`Plugin`] and opts into capabilities by overriding the
//! matching `as_*_provider` accessor. Capability values use `#[async_trait]`
//! so they stay object safe behind `Arc<dyn _>`.

pub mod chat;
pub mod command;
pub mod conversation;
pub mod cron;
pub mod host;
pub mod migration;
pub mod plugin;
pub mod topic;

pub use chat::{
    ChatBot, ChatCommand, ChatCommandMeta, ChatCommandProvider, ChatCommandScope, ChatUpdate,
};
pub use command::{CommandProvider, PluginCommand};
pub use conversation::{
    ChatConversationProvider, Conversation, ConversationContext, ConversationEngine,
    ConversationState, ConversationStore, Step,
};
pub use cron::{CronJob, CronJobMeta, CronProvider};
pub use host::{Attachment, Host, Notification, Notifier};
pub use migration::MigrationProvider;
pub use plugin::Plugin;
pub use topic::{QoS, SubscriberMeta, TopicSubscriber, TopicSubscriberProvider};
