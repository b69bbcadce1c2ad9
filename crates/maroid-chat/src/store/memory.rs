// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use maroid_core::{ConversationState, ConversationStore, MaroidError};
use tokio::sync::Mutex;

/// Keeps conversation states in process memory. States are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    states: Mutex<HashMap<String, ConversationState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, MaroidError> {
        Ok(self.states.lock().await.get(user_id).cloned())
    }

    async fn save(&self, mut state: ConversationState) -> Result<(), MaroidError> {
        state.updated_at = Utc::now();
        self.states
            .lock()
            .await
            .insert(state.user_id.clone(), state);
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<(), MaroidError> {
        self.states.lock().await.remove(user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::Map;

    fn state(user: &str, step: &str) -> ConversationState {
        ConversationState {
            user_id: user.to_string(),
            conversation_id: "parking".to_string(),
            step_id: step.to_string(),
            data: Map::new(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn save_replaces_and_stamps() {
        let store = MemoryStore::new();
        store.save(state("1", "ask_location")).await.unwrap();
        store.save(state("1", "confirm")).await.unwrap();

        let saved = store.get("1").await.unwrap().unwrap();
        assert_eq!(saved.step_id, "confirm");
        assert!(saved.updated_at > DateTime::<Utc>::UNIX_EPOCH);
        assert!(store.get("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_removes_only_that_user() {
        let store = MemoryStore::new();
        store.save(state("1", "a")).await.unwrap();
        store.save(state("2", "a")).await.unwrap();
        store.clear("1").await.unwrap();
        store.clear("missing").await.unwrap();

        assert!(store.get("1").await.unwrap().is_none());
        assert!(store.get("2").await.unwrap().is_some());
    }
}
