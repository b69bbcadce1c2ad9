// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Maroid crates.
//!
//! Everything here runs without a database or broker.
//!
//! # Components
//!
//! - [`MockHost`] - host with a no-op tracing dispatcher and optional services
//! - [`MockPlugin`] - builder-configured plugin exposing any subset of capabilities
//! - [`RecordingCronJob`], [`RecordingSubscriber`], [`RecordingCommand`],
//!   [`RecordingChatCommand`] - capability values that record their invocations
//! - [`ScriptedConversation`] - conversation whose steps follow a fixed script

pub mod conversation;
pub mod mock_host;
pub mod mock_plugin;
pub mod recording;

pub use conversation::{ScriptedConversation, ScriptedStep};
pub use mock_host::MockHost;
pub use mock_plugin::MockPlugin;
pub use recording::{RecordingChatCommand, RecordingCommand, RecordingCronJob, RecordingSubscriber};

/// A chat update from `user_id` carrying `text`.
pub fn chat_update(user_id: i64, text: &str) -> maroid_core::ChatUpdate {
    maroid_core::ChatUpdate {
        update_id: 1,
        chat_id: user_id,
        user_id,
        username: None,
        text: Some(text.to_string()),
    }
}
