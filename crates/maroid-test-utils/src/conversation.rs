// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A conversation driven by a fixed script.

use std::sync::Arc;

use async_trait::async_trait;
use maroid_core::{ChatUpdate, Conversation, ConversationContext, MaroidError, Step};
use tokio::sync::Mutex;

/// A step that stores each reply under its own ID in the context data and
/// then moves to `next`. A reply of `fail` makes `on_message` error.
pub struct ScriptedStep {
    id: String,
    next: Option<String>,
    entered: Mutex<usize>,
}

impl ScriptedStep {
    pub fn new(id: &str, next: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            next: next.map(str::to_string),
            entered: Mutex::new(0),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// How many times `on_enter` ran.
    pub async fn entered(&self) -> usize {
        *self.entered.lock().await
    }
}

#[async_trait]
impl Step for ScriptedStep {
    fn id(&self) -> String {
        self.id.clone()
    }

    async fn on_enter(
        &self,
        _ctx: &mut ConversationContext,
        _update: &ChatUpdate,
    ) -> Result<(), MaroidError> {
        *self.entered.lock().await += 1;
        Ok(())
    }

    async fn on_message(
        &self,
        ctx: &mut ConversationContext,
        update: &ChatUpdate,
    ) -> Result<Option<String>, MaroidError> {
        if update.text() == "fail" {
            return Err(MaroidError::plugin("scripted failure"));
        }
        ctx.data
            .insert(self.id.clone(), serde_json::Value::from(update.text()));
        Ok(self.next.clone())
    }
}

/// A conversation over a list of steps; the first step is the entry.
pub struct ScriptedConversation {
    id: String,
    entry: String,
    steps: Vec<Arc<dyn Step>>,
}

impl ScriptedConversation {
    pub fn new(id: &str, steps: Vec<Arc<dyn Step>>) -> Self {
        let entry = steps.first().map(|s| s.id()).unwrap_or_default();
        Self {
            id: id.to_string(),
            entry,
            steps,
        }
    }

    /// Overrides the entry step.
    pub fn with_entry(mut self, entry: &str) -> Self {
        self.entry = entry.to_string();
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Conversation for ScriptedConversation {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn entry(&self) -> String {
        self.entry.clone()
    }

    fn steps(&self) -> Vec<Arc<dyn Step>> {
        self.steps.clone()
    }
}
