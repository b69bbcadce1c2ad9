// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat commands, namespaced per plugin.

use std::sync::Arc;

use async_trait::async_trait;
use maroid_core::{ChatCommand, ChatCommandMeta, ChatUpdate, MaroidError, PluginId};

use super::Registry;

/// Chat commands keyed by their namespaced token (`dev_maroid_foo_status`).
pub type ChatCommandRegistry = Registry<Arc<dyn ChatCommand>>;

/// Wraps a plugin's chat command so its token and description carry the
/// plugin identity. Validation and handling go to the wrapped command.
pub struct NamespacedChatCommand {
    meta: ChatCommandMeta,
    inner: Arc<dyn ChatCommand>,
}

impl NamespacedChatCommand {
    pub fn new(plugin: &PluginId, inner: Arc<dyn ChatCommand>) -> Self {
        let mut meta = inner.meta();
        meta.command = format!("{}_{}", plugin.to_safe_name("_"), meta.command);
        meta.description = format!("{} (plugin {plugin})", meta.description);
        Self { meta, inner }
    }
}

#[async_trait]
impl ChatCommand for NamespacedChatCommand {
    fn meta(&self) -> ChatCommandMeta {
        self.meta.clone()
    }

    fn validate(&self, update: &ChatUpdate) -> Result<(), MaroidError> {
        self.inner.validate(update)
    }

    async fn handle(&self, update: &ChatUpdate) -> Result<(), MaroidError> {
        self.inner.handle(update).await
    }
}
