// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use maroid_core::{ConversationState, ConversationStore, Database, MaroidError};
use serde_json::{Map, Value};
use tokio_postgres::Row;

const SELECT_STATE: &str = "SELECT user_id, conversation_id, step_id, data, updated_at \
     FROM public.conversation_states WHERE user_id = $1";

const UPSERT_STATE: &str = "INSERT INTO public.conversation_states \
     (user_id, conversation_id, step_id, data, updated_at) \
     VALUES ($1, $2, $3, $4, $5) \
     ON CONFLICT (user_id) DO UPDATE SET \
     conversation_id = EXCLUDED.conversation_id, \
     step_id = EXCLUDED.step_id, \
     data = EXCLUDED.data, \
     updated_at = EXCLUDED.updated_at";

const DELETE_STATE: &str = "DELETE FROM public.conversation_states WHERE user_id = $1";

/// Keeps conversation states in the core `conversation_states` table, so
/// users keep their place across restarts.
pub struct PostgresConversationStore {
    db: Arc<Database>,
}

impl PostgresConversationStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn state_from_row(row: &Row) -> Result<ConversationState, MaroidError> {
    let data = match row.try_get::<_, Value>("data")? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Ok(ConversationState {
        user_id: row.try_get("user_id")?,
        conversation_id: row.try_get("conversation_id")?,
        step_id: row.try_get("step_id")?,
        data,
        updated_at: row.try_get::<_, DateTime<Utc>>("updated_at")?,
    })
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, MaroidError> {
        let client = self.db.connection().await?;
        client
            .query_opt(SELECT_STATE, &[&user_id])
            .await?
            .as_ref()
            .map(state_from_row)
            .transpose()
    }

    async fn save(&self, state: ConversationState) -> Result<(), MaroidError> {
        let data = Value::Object(state.data);
        let client = self.db.connection().await?;
        client
            .execute(
                UPSERT_STATE,
                &[
                    &state.user_id,
                    &state.conversation_id,
                    &state.step_id,
                    &data,
                    &Utc::now(),
                ],
            )
            .await?;
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<(), MaroidError> {
        let client = self.db.connection().await?;
        client.execute(DELETE_STATE, &[&user_id]).await?;
        Ok(())
    }
}
