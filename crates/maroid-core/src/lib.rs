// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin API for the Maroid hub.
//!
//! This crate is what plugins link against: identity and metadata types, the
//! [`Plugin`] trait with its optional capabilities, the [`Host`] services a
//! plugin may use, and the [`MaroidError`] taxonomy shared with the host.

pub mod database;
pub mod declaration;
pub mod error;
pub mod migration;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use database::{Connection, Database, PluginDatabase};
pub use declaration::{PluginConfigMap, PluginDeclaration, decode_config};
pub use error::MaroidError;
pub use migration::{MigrationFile, MigrationSource};
pub use types::{API_VERSION, CapabilityKind, PluginId, PluginMetadata};

pub use traits::{
    ChatBot, ChatCommand, ChatCommandMeta, ChatCommandProvider, ChatCommandScope,
    ChatConversationProvider, ChatUpdate, CommandProvider, Conversation, ConversationContext,
    ConversationEngine, ConversationState, ConversationStore, CronJob, CronJobMeta, CronProvider,
    Host, MigrationProvider, Notification, Notifier, Plugin, PluginCommand, QoS, Step,
    SubscriberMeta, TopicSubscriber, TopicSubscriberProvider,
};

/// Re-exported so plugins can build futures for `PluginDatabase::with_transaction`
/// and implement async capability traits without extra dependencies.
pub use async_trait::async_trait;
pub use futures::future::BoxFuture;
pub use tokio_util::sync::CancellationToken;
