// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use maroid_core::{CapabilityKind, MaroidError, Plugin};

use super::{Registrar, not_supported, retrieval};
use crate::registries::{LoadedPlugin, Registries};
use crate::registry::RegisteredSubscriber;
use crate::registry::topic_subscriber::{effective_topic, validate_relative_topic};

/// Registers a plugin's topic subscribers under their namespaced topics.
pub struct TopicSubscriberRegistrar;

impl Registrar for TopicSubscriberRegistrar {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::TopicSubscriber
    }

    fn supports(&self, plugin: &dyn Plugin) -> bool {
        plugin.as_topic_subscriber_provider().is_some()
    }

    fn register(&self, plugin: &LoadedPlugin, registries: &mut Registries) -> Result<(), MaroidError> {
        let provider = plugin
            .instance
            .as_topic_subscriber_provider()
            .ok_or_else(|| not_supported(self.kind()))?;
        let subscribers = provider
            .topic_subscribers()
            .map_err(retrieval(self.kind()))?;

        let mut entries = Vec::with_capacity(subscribers.len());
        for subscriber in subscribers {
            let meta = subscriber.meta();
            validate_relative_topic(&meta.topic)?;
            entries.push((
                effective_topic(&plugin.id, &meta.topic),
                RegisteredSubscriber {
                    plugin: plugin.id.clone(),
                    relative_topic: meta.topic,
                    subscriber,
                },
            ));
        }

        registries.topic_subscribers.register_all(entries)
    }
}
