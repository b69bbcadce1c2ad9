// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pub/sub topic subscriber capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MaroidError;

/// Delivery guarantee requested for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QoS {
    #[default]
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl TryFrom<u8> for QoS {
    type Error = MaroidError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::AtMostOnce),
            1 => Ok(Self::AtLeastOnce),
            2 => Ok(Self::ExactlyOnce),
            other => Err(MaroidError::plugin(format!("invalid QoS level {other}"))),
        }
    }
}

/// Metadata for a topic subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberMeta {
    pub id: String,
    /// Topic pattern relative to the plugin namespace. `+` and `#` wildcards are allowed.
    pub topic: String,
    pub qos: QoS,
}

/// Handles messages arriving on a declared topic pattern.
#[async_trait]
pub trait TopicSubscriber: Send + Sync {
    fn meta(&self) -> SubscriberMeta;

    /// Handles one message. `topic` is relative to the plugin namespace.
    async fn handle(&self, topic: &str, payload: &[u8]) -> Result<(), MaroidError>;
}

/// Capability: the plugin contributes topic subscribers.
pub trait TopicSubscriberProvider: Send + Sync {
    fn topic_subscribers(&self) -> Result<Vec<Arc<dyn TopicSubscriber>>, MaroidError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qos_from_level() {
        assert_eq!(QoS::try_from(1).unwrap(), QoS::AtLeastOnce);
        assert!(QoS::try_from(3).is_err());
    }
}
