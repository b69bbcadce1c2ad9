// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock plugin host.

use std::sync::Arc;

use async_trait::async_trait;
use maroid_core::{ConversationEngine, Host, MaroidError};

/// A [`Host`] that offers no database and, unless configured, no
/// conversation engine.
#[derive(Clone, Default)]
pub struct MockHost {
    engine: Option<Arc<dyn ConversationEngine>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn Host> {
        Arc::new(Self::new())
    }

    pub fn with_conversation_engine(mut self, engine: Arc<dyn ConversationEngine>) -> Self {
        self.engine = Some(engine);
        self
    }
}

#[async_trait]
impl Host for MockHost {
    fn dispatch(&self) -> tracing::Dispatch {
        tracing::dispatcher::get_default(Clone::clone)
    }

    async fn conversation_engine(&self) -> Result<Arc<dyn ConversationEngine>, MaroidError> {
        self.engine
            .clone()
            .ok_or(MaroidError::Unavailable("conversation engine"))
    }
}
