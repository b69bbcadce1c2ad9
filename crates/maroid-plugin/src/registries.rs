// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The aggregate of everything plugin loading produced.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use libloading::Library;
use maroid_core::{CapabilityKind, Plugin, PluginId, PluginMetadata};

use crate::registry::{
    ChatCommandRegistry, ChatConversationRegistry, CommandRegistry, CronRegistry,
    MigrationRegistry, Registry, TopicSubscriberRegistry,
};

/// Where a plugin came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOrigin {
    /// A shared library opened at this path.
    Library(PathBuf),
    /// Linked into the host binary.
    InProcess,
}

impl fmt::Display for PluginOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(path) => write!(f, "{}", path.display()),
            Self::InProcess => write!(f, "<in-process>"),
        }
    }
}

/// A plugin that passed validation and capability fan-out.
#[derive(Clone)]
pub struct LoadedPlugin {
    pub id: PluginId,
    pub meta: PluginMetadata,
    pub origin: PluginOrigin,
    pub instance: Arc<dyn Plugin>,
    /// Capability kinds the plugin contributed to, in registrar order.
    pub capabilities: Vec<CapabilityKind>,
}

/// All capability registries plus the plugins and libraries backing them.
///
/// Field order matters: libraries are declared last so they are unloaded only
/// after every plugin object and capability value they provide code for.
pub struct Registries {
    pub plugins: Vec<LoadedPlugin>,
    pub commands: CommandRegistry,
    pub cron_jobs: CronRegistry,
    pub migrations: MigrationRegistry,
    pub chat_commands: ChatCommandRegistry,
    pub chat_conversations: ChatConversationRegistry,
    pub topic_subscribers: TopicSubscriberRegistry,
    libraries: Vec<Library>,
}

impl Registries {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            commands: Registry::new(CapabilityKind::Command),
            cron_jobs: Registry::new(CapabilityKind::Cron),
            migrations: Registry::new(CapabilityKind::Migration),
            chat_commands: Registry::new(CapabilityKind::ChatCommand),
            chat_conversations: Registry::new(CapabilityKind::ChatConversation),
            topic_subscribers: Registry::new(CapabilityKind::TopicSubscriber),
            libraries: Vec::new(),
        }
    }

    pub fn plugin(&self, id: &PluginId) -> Option<&LoadedPlugin> {
        self.plugins.iter().find(|p| &p.id == id)
    }

    /// Keeps a library mapped for as long as these registries live.
    pub(crate) fn retain_library(&mut self, library: Library) {
        self.libraries.push(library);
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registries")
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.id.to_string()).collect::<Vec<_>>(),
            )
            .field("commands", &self.commands)
            .field("cron_jobs", &self.cron_jobs)
            .field("migrations", &self.migrations)
            .field("chat_commands", &self.chat_commands)
            .field("chat_conversations", &self.chat_conversations)
            .field("topic_subscribers", &self.topic_subscribers)
            .field("libraries", &self.libraries.len())
            .finish()
    }
}
