// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maroid migrate`.

use std::sync::Arc;

use maroid_core::MaroidError;
use maroid_storage::{MigrationTarget, Migrator, build_plan};

use crate::container::Container;

/// Applies pending migrations for `target`.
///
/// The target is resolved against the registry before a database connection
/// is opened, so a typo never touches the database.
pub async fn up(container: &Arc<Container>, target: &str) -> Result<(), MaroidError> {
    let target: MigrationTarget = target.parse()?;
    let registries = container.registries().await?;
    let plan = build_plan(&target, &registries.migrations)?;

    let db = container.database().await?;
    Migrator::new(db).up(&plan).await
}
