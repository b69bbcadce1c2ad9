// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-plugin CLI command groups.

use std::sync::Arc;

use maroid_core::{PluginCommand, PluginId};

use super::Registry;

/// Command groups keyed by group name (`dev-maroid-foo`).
pub type CommandRegistry = Registry<PluginCommandGroup>;

/// The root command under which one plugin's subcommands are nested.
#[derive(Clone)]
pub struct PluginCommandGroup {
    pub plugin: PluginId,
    pub name: String,
    pub about: String,
    pub long_about: String,
    pub commands: Vec<Arc<dyn PluginCommand>>,
}

impl PluginCommandGroup {
    pub fn new(plugin: &PluginId, version: &str, commands: Vec<Arc<dyn PluginCommand>>) -> Self {
        Self {
            plugin: plugin.clone(),
            name: plugin.to_safe_name("-"),
            about: format!("Commands provided by plugin {plugin}"),
            long_about: format!("Commands registered by plugin {plugin} (version: {version})."),
            commands,
        }
    }

    /// Builds the clap subtree for this group.
    pub fn to_command(&self) -> clap::Command {
        self.commands.iter().fold(
            clap::Command::new(self.name.clone())
                .about(self.about.clone())
                .long_about(self.long_about.clone())
                .subcommand_required(true)
                .arg_required_else_help(true),
            |group, cmd| group.subcommand(cmd.command()),
        )
    }

    /// Finds the subcommand named `name`.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn PluginCommand>> {
        self.commands
            .iter()
            .find(|cmd| cmd.command().get_name() == name)
    }
}
