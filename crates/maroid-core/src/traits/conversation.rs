// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-step chat conversations.
//!
//! A conversation is a set of named steps with an entry step. The host keeps
//! one [`ConversationState`] per user and moves it from step to step as the
//! user replies.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MaroidError;
use crate::traits::chat::ChatUpdate;

/// Mutable per-user data handed to step callbacks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversationContext {
    pub user_id: String,
    pub conversation_id: String,
    pub data: Map<String, Value>,
}

/// A single step of a conversation.
#[async_trait]
pub trait Step: Send + Sync {
    fn id(&self) -> String;

    /// Called when the user arrives at this step, typically to ask a question.
    async fn on_enter(
        &self,
        ctx: &mut ConversationContext,
        update: &ChatUpdate,
    ) -> Result<(), MaroidError>;

    /// Handles the user's reply. `Ok(None)` finishes the conversation,
    /// `Ok(Some(step))` moves to `step`.
    async fn on_message(
        &self,
        ctx: &mut ConversationContext,
        update: &ChatUpdate,
    ) -> Result<Option<String>, MaroidError>;
}

/// A conversation flow.
pub trait Conversation: Send + Sync {
    fn id(&self) -> String;

    /// ID of the step the conversation starts at.
    fn entry(&self) -> String;

    fn steps(&self) -> Vec<Arc<dyn Step>>;
}

/// Capability: the plugin contributes conversations.
pub trait ChatConversationProvider: Send + Sync {
    fn chat_conversations(&self) -> Result<Vec<Arc<dyn Conversation>>, MaroidError>;
}

/// Persisted position of a user inside a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub user_id: String,
    pub conversation_id: String,
    pub step_id: String,
    pub data: Map<String, Value>,
    pub updated_at: DateTime<Utc>,
}

/// Storage for conversation states, one per user.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, MaroidError>;

    /// Inserts or replaces the state of `state.user_id`.
    async fn save(&self, state: ConversationState) -> Result<(), MaroidError>;

    async fn clear(&self, user_id: &str) -> Result<(), MaroidError>;
}

/// Drives users through registered conversations.
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Puts the user at the entry step of `conversation_id`.
    async fn start(&self, update: &ChatUpdate, conversation_id: &str) -> Result<(), MaroidError>;

    /// Feeds a message to the user's current step, if the user is in a conversation.
    async fn handle_message(&self, update: &ChatUpdate) -> Result<(), MaroidError>;
}
