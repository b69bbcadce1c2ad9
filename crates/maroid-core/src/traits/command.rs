// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI command capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MaroidError;

/// A CLI subcommand contributed by a plugin.
///
/// The host nests every command of a plugin under a per-plugin group, so the
/// command name only has to be unique within its plugin.
#[async_trait]
pub trait PluginCommand: Send + Sync {
    /// The clap definition of this subcommand (name, args, help).
    fn command(&self) -> clap::Command;

    /// Runs the subcommand with the arguments clap matched for it.
    async fn run(&self, matches: &clap::ArgMatches) -> Result<(), MaroidError>;
}

/// Capability: the plugin contributes CLI subcommands.
pub trait CommandProvider: Send + Sync {
    fn commands(&self) -> Result<Vec<Arc<dyn PluginCommand>>, MaroidError>;
}
