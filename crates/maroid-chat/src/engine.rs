// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use maroid_core::{
    ChatUpdate, ConversationContext, ConversationEngine, ConversationState, ConversationStore,
    MaroidError, Step,
};
use maroid_plugin::Registries;
use maroid_plugin::registry::RegisteredConversation;
use serde_json::Map;
use tracing::{debug, error};

/// Drives users through the conversations in the chat-conversation registry.
pub struct Engine {
    registries: Arc<Registries>,
    store: Arc<dyn ConversationStore>,
}

impl Engine {
    pub fn new(registries: Arc<Registries>, store: Arc<dyn ConversationStore>) -> Self {
        Self { registries, store }
    }

    fn conversation(&self, id: &str) -> Result<&RegisteredConversation, MaroidError> {
        self.registries
            .chat_conversations
            .get(id)
            .ok_or_else(|| MaroidError::ConversationNotFound(id.to_string()))
    }

    /// Enters `step` and persists whatever it wrote into the context.
    async fn enter(
        &self,
        step: &Arc<dyn Step>,
        mut state: ConversationState,
        ctx: &mut ConversationContext,
        update: &ChatUpdate,
    ) -> Result<(), MaroidError> {
        step.on_enter(ctx, update)
            .await
            .map_err(|e| MaroidError::Plugin {
                message: format!("entering step {}", state.step_id),
                source: Some(Box::new(e)),
            })?;

        if ctx.data != state.data {
            state.data = ctx.data.clone();
            self.store.save(state).await?;
        }
        Ok(())
    }
}

fn step_not_found(conversation: &str, step: &str) -> MaroidError {
    MaroidError::ConversationStepNotFound {
        conversation: conversation.to_string(),
        step: step.to_string(),
    }
}

#[async_trait]
impl ConversationEngine for Engine {
    async fn start(&self, update: &ChatUpdate, conversation_id: &str) -> Result<(), MaroidError> {
        let user_id = update.user_id.to_string();
        let conversation = self.conversation(conversation_id)?;
        let entry = conversation.conversation.entry();
        let step = conversation
            .step(&entry)
            .ok_or_else(|| step_not_found(conversation_id, &entry))?;

        let state = ConversationState {
            user_id: user_id.clone(),
            conversation_id: conversation_id.to_string(),
            step_id: entry,
            data: Map::new(),
            updated_at: Utc::now(),
        };
        self.store.save(state.clone()).await?;
        debug!(user_id = %user_id, conversation_id, step_id = %state.step_id, "conversation started");

        let mut ctx = ConversationContext {
            user_id,
            conversation_id: conversation_id.to_string(),
            data: Map::new(),
        };
        self.enter(step, state, &mut ctx, update).await
    }

    async fn handle_message(&self, update: &ChatUpdate) -> Result<(), MaroidError> {
        let user_id = update.user_id.to_string();
        let Some(mut state) = self.store.get(&user_id).await? else {
            return Ok(());
        };

        let conversation = self.conversation(&state.conversation_id)?;
        let step = conversation
            .step(&state.step_id)
            .ok_or_else(|| step_not_found(&state.conversation_id, &state.step_id))?;

        let mut ctx = ConversationContext {
            user_id: user_id.clone(),
            conversation_id: state.conversation_id.clone(),
            data: state.data.clone(),
        };

        let next = match step.on_message(&mut ctx, update).await {
            Ok(next) => next,
            Err(e) => {
                // The state stays on this step so the user can answer again.
                error!(
                    conversation_id = %state.conversation_id,
                    step_id = %state.step_id,
                    user_id = %user_id,
                    error = %e,
                    "processing conversation step failed"
                );
                return Ok(());
            }
        };

        let Some(next) = next else {
            self.store.clear(&user_id).await?;
            debug!(user_id = %user_id, conversation_id = %state.conversation_id, "conversation finished");
            return Ok(());
        };

        let next_step = conversation
            .step(&next)
            .ok_or_else(|| step_not_found(&state.conversation_id, &next))?;

        state.step_id = next;
        state.data = ctx.data.clone();
        self.store.save(state.clone()).await?;
        self.enter(next_step, state, &mut ctx, update).await
    }
}
