// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line definition.
//!
//! The built-in commands are derived; plugin command groups are attached at
//! runtime once plugins are loaded.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use maroid_plugin::Registries;

/// Maroid - a plugin-driven home automation hub.
#[derive(Parser, Debug)]
#[command(name = "maroid", version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run background workers until interrupted.
    Worker {
        /// Workers to run, comma separated (cron, mqtt, or all).
        #[arg(long, short = 'w', value_delimiter = ',', default_value = "all")]
        workers: Vec<String>,
    },
    /// Manage database migrations.
    Migrate {
        #[command(subcommand)]
        command: MigrateCommand,
    },
    /// Inspect loaded plugins.
    Plugins {
        #[command(subcommand)]
        command: PluginsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum MigrateCommand {
    /// Apply pending migrations.
    Up {
        /// `core`, `all`, or a plugin ID.
        #[arg(long, short = 't', default_value = "all")]
        target: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PluginsCommand {
    /// List loaded plugins and what they contribute.
    List,
}

/// The full command tree: built-ins plus one group per plugin with commands.
pub fn command(registries: &Registries) -> clap::Command {
    registries
        .commands
        .values()
        .fold(Cli::command(), |cli, group| cli.subcommand(group.to_command()))
}

/// Finds `--config` ahead of full parsing, which needs loaded plugins and
/// therefore the configuration.
pub fn config_path<I, T>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into).skip(1);
    while let Some(arg) = args.next() {
        let Some(arg) = arg.to_str() else {
            continue;
        };
        if arg == "--" {
            break;
        }
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use maroid_plugin::Loader;
    use maroid_test_utils::{MockHost, MockPlugin, RecordingCommand};

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn worker_defaults_to_all() {
        let cli = Cli::try_parse_from(["maroid", "worker"]).unwrap();
        match cli.command {
            Commands::Worker { workers } => assert_eq!(workers, ["all"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn worker_list_is_comma_separated() {
        let cli = Cli::try_parse_from(["maroid", "worker", "-w", "cron,mqtt"]).unwrap();
        match cli.command {
            Commands::Worker { workers } => assert_eq!(workers, ["cron", "mqtt"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn migrate_up_defaults_to_all() {
        let cli = Cli::try_parse_from(["maroid", "migrate", "up"]).unwrap();
        match cli.command {
            Commands::Migrate {
                command: MigrateCommand::Up { target },
            } => assert_eq!(target, "all"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["maroid", "migrate", "up", "--config", "/etc/hub.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/hub.toml")));
    }

    #[test]
    fn config_path_is_found_anywhere_before_separator() {
        assert_eq!(
            config_path(["maroid", "worker", "-c", "a.toml"]),
            Some(PathBuf::from("a.toml"))
        );
        assert_eq!(
            config_path(["maroid", "--config=b.toml", "worker"]),
            Some(PathBuf::from("b.toml"))
        );
        assert_eq!(config_path(["maroid", "worker"]), None);
        assert_eq!(config_path(["maroid", "dev-maroid-foo", "--", "-c", "x"]), None);
    }

    #[test]
    fn plugin_groups_join_the_tree() {
        let mut loader = Loader::new(MockHost::shared());
        loader
            .register_instance(
                MockPlugin::new("dev.maroid.foo")
                    .command(RecordingCommand::new("sync").shared())
                    .into_arc(),
            )
            .unwrap();
        let registries = loader.finish();

        let matches = command(&registries)
            .try_get_matches_from(["maroid", "dev-maroid-foo", "sync", "now"])
            .unwrap();
        let (group, sub) = matches.subcommand().unwrap();
        assert_eq!(group, "dev-maroid-foo");
        assert_eq!(sub.subcommand_name(), Some("sync"));
    }
}
