// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maroid - a plugin-driven home automation hub.
//!
//! This is the binary entry point: it loads configuration, sets up tracing,
//! loads plugins and runs the selected command.

mod cli;
mod container;
mod host;
mod logging;
mod migrate;
mod plugins;
mod worker;

use std::sync::Arc;

use clap::{ArgMatches, FromArgMatches};
use maroid_core::MaroidError;
use maroid_plugin::Registries;
use maroid_plugin::registry::PluginCommandGroup;
use tracing::error;

use crate::cli::{Cli, Commands, MigrateCommand, PluginsCommand};
use crate::container::Container;

#[tokio::main]
async fn main() {
    let config_path = cli::config_path(std::env::args_os());

    let config = match maroid_config::load_and_validate(config_path.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            maroid_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    logging::init_tracing(&config.log);

    let container = Container::new(config);
    let result = run(&container).await;
    container.close();

    if let Err(e) = result {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run(container: &Arc<Container>) -> Result<(), MaroidError> {
    let registries = container.registries().await?;
    let matches = cli::command(&registries).get_matches();
    execute(container, &registries, &matches).await
}

/// Routes parsed arguments to a plugin command group or a built-in command.
async fn execute(
    container: &Arc<Container>,
    registries: &Arc<Registries>,
    matches: &ArgMatches,
) -> Result<(), MaroidError> {
    if let Some((name, sub_matches)) = matches.subcommand() {
        if let Some(group) = registries.commands.get(name) {
            return run_plugin_command(group, sub_matches).await;
        }
    }

    let cli = Cli::from_arg_matches(matches).map_err(|e| MaroidError::Internal(e.to_string()))?;
    match cli.command {
        Commands::Worker { workers } => worker::run(container, &workers).await,
        Commands::Migrate {
            command: MigrateCommand::Up { target },
        } => migrate::up(container, &target).await,
        Commands::Plugins {
            command: PluginsCommand::List,
        } => plugins::list(registries, &mut std::io::stdout().lock())
            .map_err(|e| MaroidError::Internal(format!("writing plugin list: {e}"))),
    }
}

async fn run_plugin_command(
    group: &PluginCommandGroup,
    matches: &ArgMatches,
) -> Result<(), MaroidError> {
    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| MaroidError::Internal(format!("no subcommand given for {}", group.name)))?;
    let command = group
        .find(name)
        .ok_or_else(|| MaroidError::Internal(format!("unknown subcommand {}/{name}", group.name)))?;
    command.run(sub_matches).await
}
