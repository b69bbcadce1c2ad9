// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Migration planning over a populated registry.

use std::sync::Arc;

use maroid_core::{MaroidError, MigrationFile, MigrationSource};
use maroid_plugin::{CORE_COMPONENT, Loader};
use maroid_storage::{MigrationTarget, build_plan, core_migrations};
use maroid_test_utils::{MockHost, MockPlugin};

fn plugin_migrations(name: &str) -> MigrationSource {
    MigrationSource::Embedded(vec![MigrationFile::new(
        format!("V1__{name}"),
        "CREATE TABLE readings (id BIGINT PRIMARY KEY);",
    )])
}

fn registries() -> maroid_plugin::Registries {
    let mut loader = Loader::new(MockHost::shared());
    loader
        .registries_mut()
        .migrations
        .register(CORE_COMPONENT, core_migrations())
        .unwrap();
    for id in ["dev.maroid.foo", "dev.maroid.bar"] {
        loader
            .register_instance(
                MockPlugin::new(id)
                    .migrations(plugin_migrations("readings"))
                    .into_arc(),
            )
            .unwrap();
    }
    loader
        .register_instance(Arc::new(MockPlugin::new("dev.maroid.empty")))
        .unwrap();
    loader.finish()
}

#[test]
fn all_runs_core_first_then_plugins_in_load_order() {
    let registries = registries();
    let plan = build_plan(&MigrationTarget::All, &registries.migrations).unwrap();
    assert_eq!(plan.order, ["core", "dev.maroid.foo", "dev.maroid.bar"]);
}

#[test]
fn core_target_is_core_only() {
    let registries = registries();
    let plan = build_plan(&MigrationTarget::Core, &registries.migrations).unwrap();
    assert_eq!(plan.order, ["core"]);
    assert_eq!(plan.sources.len(), 1);
}

#[test]
fn plugin_target_is_that_plugin_only() {
    let registries = registries();
    let plan = build_plan(
        &MigrationTarget::Plugin("dev.maroid.bar".into()),
        &registries.migrations,
    )
    .unwrap();
    assert_eq!(plan.order, ["dev.maroid.bar"]);
}

#[test]
fn unknown_or_migrationless_plugin_is_rejected() {
    let registries = registries();
    for id in ["dev.maroid.nope", "dev.maroid.empty"] {
        let err = build_plan(&MigrationTarget::Plugin(id.into()), &registries.migrations)
            .unwrap_err();
        assert!(
            matches!(&err, MaroidError::UnknownMigrationTarget(msg) if msg == &format!("invalid plugin ID {id}")),
            "{err}"
        );
    }
}

#[test]
fn core_migrations_are_versioned_sql() {
    let files = core_migrations().files().unwrap();
    assert!(!files.is_empty());
    for file in files {
        assert!(file.name.starts_with('V'), "{}", file.name);
        assert!(file.sql.contains("conversation_states"));
    }
}
