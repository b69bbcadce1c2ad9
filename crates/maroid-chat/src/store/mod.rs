// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state stores.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresConversationStore;
