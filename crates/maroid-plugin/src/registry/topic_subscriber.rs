// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic subscribers keyed by effective topic.

use std::sync::Arc;

use maroid_core::{MaroidError, PluginId, TopicSubscriber};

use super::Registry;

/// Subscribers keyed by effective (namespaced) topic filter.
pub type TopicSubscriberRegistry = Registry<RegisteredSubscriber>;

#[derive(Clone)]
pub struct RegisteredSubscriber {
    pub plugin: PluginId,
    /// The topic filter as declared by the subscriber.
    pub relative_topic: String,
    pub subscriber: Arc<dyn TopicSubscriber>,
}

/// Checks a subscriber's declared relative topic.
pub fn validate_relative_topic(topic: &str) -> Result<(), MaroidError> {
    let reason = if topic.is_empty() {
        "topic must not be empty"
    } else if topic.starts_with('/') {
        "topic must not start with /"
    } else if topic.starts_with('$') {
        "topic must not start with $ (reserved for broker internals)"
    } else {
        return Ok(());
    };

    Err(MaroidError::InvalidTopic {
        topic: topic.to_string(),
        reason,
    })
}

/// `dev/maroid/foo` + `measurement/+` → `dev/maroid/foo/measurement/+`.
pub fn effective_topic(plugin: &PluginId, relative: &str) -> String {
    format!("{}/{relative}", plugin.topic_namespace())
}

/// The namespace part of an effective topic, i.e. the effective topic with
/// the subscriber's relative suffix removed.
pub fn namespace_of<'a>(effective: &'a str, relative: &str) -> &'a str {
    effective
        .strip_suffix(relative)
        .and_then(|ns| ns.strip_suffix('/'))
        .unwrap_or(effective)
}

/// Strips `namespace/` from a concrete topic so the subscriber sees its relative topic.
pub fn relative_topic<'a>(namespace: &str, topic: &'a str) -> &'a str {
    topic
        .strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_relative_topics() {
        for (topic, reason) in [
            ("", "topic must not be empty"),
            ("/abs", "topic must not start with /"),
            ("$SYS/x", "topic must not start with $ (reserved for broker internals)"),
        ] {
            match validate_relative_topic(topic) {
                Err(MaroidError::InvalidTopic { reason: r, .. }) => assert_eq!(r, reason),
                other => panic!("{topic:?}: unexpected {other:?}"),
            }
        }
        assert!(validate_relative_topic("measurement/+").is_ok());
        assert!(validate_relative_topic("#").is_ok());
    }

    #[test]
    fn effective_topic_and_back() {
        let id = PluginId::parse("dev.maroid.jasmine").unwrap();
        let effective = effective_topic(&id, "measurement/+");
        assert_eq!(effective, "dev/maroid/jasmine/measurement/+");

        let namespace = namespace_of(&effective, "measurement/+");
        assert_eq!(namespace, "dev/maroid/jasmine");
        assert_eq!(
            relative_topic(namespace, "dev/maroid/jasmine/measurement/soil"),
            "measurement/soil"
        );
    }
}
