// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database migrations for the Maroid hub and its plugins.
//!
//! Every migration component owns a schema and a migration history table in
//! it: the core uses `public`, a plugin uses its safe name (`dev_maroid_foo`).
//! Components can therefore be migrated, added or removed independently.

pub mod migrator;
pub mod plan;

use maroid_core::{MigrationFile, MigrationSource};

pub use migrator::Migrator;
pub use plan::{MigrationPlan, MigrationTarget, build_plan, schema_for};

/// The host's own migrations, registered as the `core` component.
pub fn core_migrations() -> MigrationSource {
    MigrationSource::Embedded(vec![MigrationFile::new(
        "V1__create_conversation_states",
        include_str!("../migrations/V1__create_conversation_states.sql"),
    )])
}
