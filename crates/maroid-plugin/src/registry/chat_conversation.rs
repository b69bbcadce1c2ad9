// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat conversations with per-step lookup.

use std::sync::Arc;

use indexmap::IndexMap;
use maroid_core::{CapabilityKind, Conversation, MaroidError, PluginId, Step};

use super::Registry;

/// Conversations keyed by conversation ID.
pub type ChatConversationRegistry = Registry<RegisteredConversation>;

/// A conversation with its steps indexed by step ID.
#[derive(Clone)]
pub struct RegisteredConversation {
    pub plugin: PluginId,
    pub conversation: Arc<dyn Conversation>,
    steps: IndexMap<String, Arc<dyn Step>>,
}

impl RegisteredConversation {
    /// Indexes the conversation's steps. Fails on a duplicate step ID or an
    /// entry step the conversation does not define.
    pub fn new(plugin: &PluginId, conversation: Arc<dyn Conversation>) -> Result<Self, MaroidError> {
        let id = conversation.id();
        let mut steps = IndexMap::new();
        for step in conversation.steps() {
            let step_id = step.id();
            if steps.contains_key(&step_id) {
                return Err(MaroidError::AlreadyRegistered {
                    kind: CapabilityKind::ChatConversation,
                    key: format!("{id}/{step_id}"),
                });
            }
            steps.insert(step_id, step);
        }

        let entry = conversation.entry();
        if !steps.contains_key(&entry) {
            return Err(MaroidError::ConversationStepNotFound {
                conversation: id,
                step: entry,
            });
        }

        Ok(Self {
            plugin: plugin.clone(),
            conversation,
            steps,
        })
    }

    pub fn step(&self, step_id: &str) -> Option<&Arc<dyn Step>> {
        self.steps.get(step_id)
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }
}

impl Registry<RegisteredConversation> {
    /// Looks up a step of a registered conversation.
    pub fn step(&self, conversation_id: &str, step_id: &str) -> Option<&Arc<dyn Step>> {
        self.get(conversation_id)?.step(step_id)
    }
}
