// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription routes derived from the topic-subscriber registry.

use std::sync::Arc;

use maroid_core::{QoS, TopicSubscriber};
use maroid_plugin::registry::TopicSubscriberRegistry;
use maroid_plugin::registry::topic_subscriber::{namespace_of, relative_topic};

use crate::topic::{shared_subscription, topic_matches};

/// One registered subscriber and where it listens.
#[derive(Clone)]
pub struct Route {
    pub subscriber_id: String,
    /// Namespaced filter, e.g. `dev/maroid/jasmine/measurement/+`.
    pub effective_topic: String,
    /// Filter sent to the broker; carries the `$share/<group>/` prefix when set.
    pub subscribe_topic: String,
    /// Effective topic without the subscriber's relative suffix.
    pub namespace: String,
    pub qos: QoS,
    pub subscriber: Arc<dyn TopicSubscriber>,
}

impl Route {
    /// Routes for every subscriber in `registry`, in registration order.
    pub fn from_registry(registry: &TopicSubscriberRegistry, shared_group: Option<&str>) -> Vec<Self> {
        registry
            .iter()
            .map(|(effective, entry)| {
                let meta = entry.subscriber.meta();
                Self {
                    subscriber_id: meta.id,
                    effective_topic: effective.to_string(),
                    subscribe_topic: shared_subscription(shared_group, effective),
                    namespace: namespace_of(effective, &entry.relative_topic).to_string(),
                    qos: meta.qos,
                    subscriber: Arc::clone(&entry.subscriber),
                }
            })
            .collect()
    }

    /// The topic as the subscriber sees it, if this route matches `topic`.
    pub fn relative<'a>(&self, topic: &'a str) -> Option<&'a str> {
        topic_matches(&self.effective_topic, topic).then(|| relative_topic(&self.namespace, topic))
    }
}
