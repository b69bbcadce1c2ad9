// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Applies a [`MigrationPlan`] with refinery.

use std::sync::Arc;

use maroid_core::database::quote_ident;
use maroid_core::{Database, MaroidError, MigrationSource};
use maroid_plugin::CORE_COMPONENT;
use refinery::{Migration, Runner};
use tokio_postgres::Client;
use tracing::{debug, info, warn};

use crate::plan::{MigrationPlan, schema_for};

/// Name of the per-schema history table.
pub const HISTORY_TABLE: &str = "refinery_schema_history";

/// Runs migrations, one pooled connection per component.
pub struct Migrator {
    db: Arc<Database>,
}

impl Migrator {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Applies every component of `plan` in order, stopping at the first failure.
    ///
    /// Components already at their latest version are a no-op.
    pub async fn up(&self, plan: &MigrationPlan) -> Result<(), MaroidError> {
        for (component, source) in plan.steps() {
            let source = source.ok_or_else(|| {
                MaroidError::Internal(format!("plan has no source for component {component}"))
            })?;
            info!(migration_component = component, "running migrations up");
            let applied = self.run_component(component, source).await?;
            info!(
                migration_component = component,
                applied, "migrations up to date"
            );
        }
        Ok(())
    }

    async fn run_component(
        &self,
        component: &str,
        source: &MigrationSource,
    ) -> Result<usize, MaroidError> {
        let fail = |source: refinery::Error| MaroidError::Migration {
            component: component.to_string(),
            source: Box::new(source),
        };

        let migrations = source
            .files()?
            .into_iter()
            .map(|file| Migration::unapplied(&file.name, &file.sql))
            .collect::<Result<Vec<_>, _>>()
            .map_err(fail)?;

        let schema = schema_for(component);
        let mut conn = self.db.connection().await?;
        let client: &mut Client = &mut conn;

        if component != CORE_COMPONENT {
            debug!(schema = %schema, "ensuring plugin schema exists");
            client
                .batch_execute(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&schema)))
                .await?;
        }

        client
            .batch_execute(&format!("SET search_path TO {}, public", quote_ident(&schema)))
            .await?;

        let mut runner = Runner::new(&migrations);
        runner.set_migration_table_name(format!("{}.{HISTORY_TABLE}", quote_ident(&schema)));
        let result = runner.run_async(&mut *client).await;

        reset_search_path(client).await;

        let report = result.map_err(fail)?;
        Ok(report.applied_migrations().len())
    }
}

async fn reset_search_path(client: &Client) {
    if let Err(e) = client.batch_execute("RESET search_path").await {
        warn!(error = %e, "failed to reset search_path after migrations");
    }
}
