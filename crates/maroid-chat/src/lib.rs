// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumers of the chat registries.
//!
//! - [`ChatRouter`] sends `/command` updates to the registered chat command
//!   and everything else to the conversation engine.
//! - [`Engine`] moves users through registered conversations, keeping their
//!   position in a [`ConversationStore`](maroid_core::ConversationStore).

pub mod command;
pub mod engine;
pub mod router;
pub mod store;

pub use command::{ParsedCommand, parse_command};
pub use engine::Engine;
pub use router::{ChatRouter, CommandScopeGroup, Routed};
pub use store::{MemoryStore, PostgresConversationStore};
