// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading real shared libraries.
//!
//! The `maroid-fixture-plugin` dev-dependency is built as a `cdylib` next to
//! this test binary; these tests open it the way the hub opens plugin files.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};

use maroid_core::{CapabilityKind, MaroidError, PluginConfigMap};
use maroid_plugin::{Loader, PluginOrigin};
use maroid_test_utils::MockHost;

const FIXTURE_ID: &str = "dev.maroid.fixture";

/// The fixture library from the target directory this test binary runs from.
fn fixture_library() -> PathBuf {
    let stem = format!("{DLL_PREFIX}maroid_fixture_plugin");
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();
    let dirs = [deps.to_path_buf(), deps.parent().unwrap().to_path_buf()];

    dirs.iter()
        .filter_map(|dir| std::fs::read_dir(dir).ok())
        .flatten()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&stem) && name.ends_with(DLL_SUFFIX))
        })
        .max_by_key(|path| path.metadata().and_then(|m| m.modified()).ok())
        .unwrap_or_else(|| panic!("{stem}{DLL_SUFFIX} not found next to {}", exe.display()))
}

fn config(pairs: &[(&str, serde_json::Value)]) -> PluginConfigMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn loader() -> Loader {
    Loader::new(MockHost::shared())
}

#[test]
fn library_plugin_is_constructed_and_registered() {
    let path = fixture_library();
    let mut loader = loader();
    let id = loader
        .load(&path, config(&[("table", "custom_readings".into())]))
        .unwrap();
    assert_eq!(id.to_string(), FIXTURE_ID);

    let registries = loader.finish();
    let loaded = registries.plugin(&id).unwrap();
    assert_eq!(loaded.origin, PluginOrigin::Library(path.clone()));
    assert_eq!(loaded.capabilities, [CapabilityKind::Migration]);

    let files = registries.migrations.get(FIXTURE_ID).unwrap().files().unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].sql.contains("CREATE TABLE custom_readings"), "{}", files[0].sql);
}

#[test]
fn loading_the_same_library_twice_is_rejected() {
    let path = fixture_library();
    let mut loader = loader();
    loader.load(&path, PluginConfigMap::new()).unwrap();

    let err = loader.load(&path, PluginConfigMap::new()).unwrap_err();
    assert!(matches!(err, MaroidError::PluginAlreadyRegistered(ref id) if id == FIXTURE_ID));

    let registries = loader.finish();
    assert_eq!(registries.plugins.len(), 1);
    assert_eq!(registries.migrations.len(), 1);
}

#[test]
fn constructor_errors_surface_unchanged() {
    let mut loader = loader();
    let err = loader
        .load(&fixture_library(), config(&[("fail", true.into())]))
        .unwrap_err();
    assert!(err.to_string().contains("fixture asked to fail"), "{err}");

    let registries = loader.finish();
    assert!(registries.plugins.is_empty());
    assert!(registries.migrations.is_empty());
}

#[test]
fn bad_plugin_config_is_a_plugin_error() {
    let mut loader = loader();
    let err = loader
        .load(&fixture_library(), config(&[("colour", "green".into())]))
        .unwrap_err();
    assert!(
        err.to_string().contains("failed to decode plugin config"),
        "{err}"
    );
}

/// A shared library that is not a plugin: the system C library.
#[cfg(target_os = "linux")]
fn system_library() -> Option<&'static Path> {
    [
        "/lib/x86_64-linux-gnu/libc.so.6",
        "/usr/lib/x86_64-linux-gnu/libc.so.6",
        "/lib/aarch64-linux-gnu/libc.so.6",
        "/usr/lib/aarch64-linux-gnu/libc.so.6",
        "/lib64/libc.so.6",
        "/usr/lib64/libc.so.6",
        "/usr/lib/libc.so.6",
        "/lib/libc.so.6",
    ]
    .into_iter()
    .map(Path::new)
    .find(|path| path.is_file())
}

#[cfg(target_os = "linux")]
#[test]
fn library_without_declaration_is_symbol_not_found() {
    let Some(libc) = system_library() else {
        eprintln!("no glibc found, skipping");
        return;
    };

    let mut loader = loader();
    let err = loader.load(libc, PluginConfigMap::new()).unwrap_err();
    match &err {
        MaroidError::SymbolNotFound { path, symbol, .. } => {
            assert_eq!(path, libc);
            assert_eq!(symbol, "MAROID_PLUGIN_DECLARATION");
        }
        other => panic!("expected SymbolNotFound, got {other}"),
    }
    assert!(loader.finish().plugins.is_empty());
}
