// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registrars: one per capability, each moving a plugin's contributions into
//! the matching registry.

mod chat_command;
mod chat_conversation;
mod command;
mod cron;
mod migration;
mod topic_subscriber;

pub use chat_command::ChatCommandRegistrar;
pub use chat_conversation::ChatConversationRegistrar;
pub use command::CommandRegistrar;
pub use cron::CronRegistrar;
pub use migration::MigrationRegistrar;
pub use topic_subscriber::TopicSubscriberRegistrar;

use maroid_core::{CapabilityKind, MaroidError, Plugin};

use crate::registries::{LoadedPlugin, Registries};

/// Detects one capability on a plugin and registers its contributions.
pub trait Registrar: Send + Sync {
    /// The capability this registrar handles; its string form is the registrar name.
    fn kind(&self) -> CapabilityKind;

    /// Whether `plugin` offers this registrar's capability.
    fn supports(&self, plugin: &dyn Plugin) -> bool;

    /// Registers the plugin's contributions. A failure leaves the affected
    /// registry unchanged.
    fn register(&self, plugin: &LoadedPlugin, registries: &mut Registries)
    -> Result<(), MaroidError>;
}

/// The six registrars in fan-out order.
pub fn default_registrars() -> Vec<Box<dyn Registrar>> {
    vec![
        Box::new(CommandRegistrar),
        Box::new(CronRegistrar),
        Box::new(MigrationRegistrar),
        Box::new(ChatCommandRegistrar),
        Box::new(ChatConversationRegistrar),
        Box::new(TopicSubscriberRegistrar),
    ]
}

fn not_supported(kind: CapabilityKind) -> MaroidError {
    MaroidError::Internal(format!("plugin does not support the {kind} capability"))
}

fn retrieval(kind: CapabilityKind) -> impl FnOnce(MaroidError) -> MaroidError {
    move |source| MaroidError::CapabilityRetrieval {
        capability: kind,
        source: Box::new(source),
    }
}
