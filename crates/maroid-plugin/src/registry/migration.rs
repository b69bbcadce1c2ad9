// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use maroid_core::MigrationSource;

use super::Registry;

/// Component ID of the host application's own migrations.
pub const CORE_COMPONENT: &str = "core";

/// Migration sources keyed by component: [`CORE_COMPONENT`] or a plugin's canonical ID.
pub type MigrationRegistry = Registry<MigrationSource>;
