// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collision-checked, append-only registries, one per capability kind.
//!
//! Registries are filled during single-threaded startup and read-only
//! afterwards. Iteration follows insertion order.

pub mod chat_command;
pub mod chat_conversation;
pub mod command;
pub mod cron;
pub mod migration;
pub mod topic_subscriber;

use indexmap::IndexMap;
use maroid_core::{CapabilityKind, MaroidError};

pub use chat_command::{ChatCommandRegistry, NamespacedChatCommand};
pub use chat_conversation::{ChatConversationRegistry, RegisteredConversation};
pub use command::{CommandRegistry, PluginCommandGroup};
pub use cron::{CronRegistry, RegisteredCronJob};
pub use migration::{CORE_COMPONENT, MigrationRegistry};
pub use topic_subscriber::{RegisteredSubscriber, TopicSubscriberRegistry};

/// A keyed store that refuses to overwrite.
pub struct Registry<V> {
    kind: CapabilityKind,
    entries: IndexMap<String, V>,
}

impl<V> Registry<V> {
    pub fn new(kind: CapabilityKind) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// Inserts one entry; fails without touching the registry if `key` is taken.
    pub fn register(&mut self, key: impl Into<String>, value: V) -> Result<(), MaroidError> {
        self.register_all([(key.into(), value)])
    }

    /// Inserts a batch atomically: if any key is already registered, or
    /// appears twice in the batch, nothing is inserted.
    pub fn register_all(
        &mut self,
        items: impl IntoIterator<Item = (String, V)>,
    ) -> Result<(), MaroidError> {
        let items: Vec<(String, V)> = items.into_iter().collect();

        for (i, (key, _)) in items.iter().enumerate() {
            let seen_in_batch = items[..i].iter().any(|(k, _)| k == key);
            if seen_in_batch || self.entries.contains_key(key) {
                return Err(MaroidError::AlreadyRegistered {
                    kind: self.kind,
                    key: key.clone(),
                });
            }
        }

        self.entries.extend(items);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> std::fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
