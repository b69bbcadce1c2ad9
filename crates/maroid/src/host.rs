// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`Host`] handed to plugin constructors.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use maroid_core::{ConversationEngine, Database, Host, MaroidError};

use crate::container::Container;

/// Resolves host services lazily through the container.
///
/// The container owns the registries that own the plugins that own this
/// host, so the back-reference is weak.
pub struct PluginHost {
    container: Weak<Container>,
}

impl PluginHost {
    pub fn new(container: Weak<Container>) -> Self {
        Self { container }
    }

    fn container(&self) -> Result<Arc<Container>, MaroidError> {
        self.container
            .upgrade()
            .ok_or(MaroidError::Unavailable("host container"))
    }
}

#[async_trait]
impl Host for PluginHost {
    fn dispatch(&self) -> tracing::Dispatch {
        tracing::dispatcher::get_default(Clone::clone)
    }

    async fn database(&self) -> Result<Arc<Database>, MaroidError> {
        self.container()?.database().await
    }

    async fn conversation_engine(&self) -> Result<Arc<dyn ConversationEngine>, MaroidError> {
        self.container()?.conversation_engine().await
    }
}
