// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared PostgreSQL pool and the schema-scoped wrapper given to plugins.

use std::sync::Arc;
use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Pool, Runtime};
use futures::future::BoxFuture;
use tokio_postgres::{Client, NoTls, Transaction};
use tracing::{debug, warn};

use crate::error::MaroidError;
use crate::types::PluginId;

/// A pooled connection. Derefs to [`tokio_postgres::Client`].
pub type Connection = deadpool_postgres::Object;

/// The PostgreSQL connection pool shared by the host and all plugins.
///
/// Every caller checks out its own connection, so independent queries and
/// transactions run concurrently up to the pool size.
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Builds a pool from a libpq-style connection string and checks out one
    /// connection to prove the server is reachable.
    pub async fn connect(
        dsn: &str,
        timeout: Duration,
        max_connections: usize,
    ) -> Result<Self, MaroidError> {
        let db = Self {
            pool: build_pool(dsn, timeout, max_connections)?,
        };
        drop(db.connection().await?);
        debug!(max_connections, "database pool ready");
        Ok(db)
    }

    /// Checks out a connection; it returns to the pool when dropped.
    pub async fn connection(&self) -> Result<Connection, MaroidError> {
        self.pool.get().await.map_err(MaroidError::storage)
    }

    /// Closes the pool. Checkouts issued afterwards fail.
    pub fn close(&self) {
        self.pool.close();
    }
}

fn build_pool(dsn: &str, timeout: Duration, max_connections: usize) -> Result<Pool, MaroidError> {
    let config: tokio_postgres::Config = dsn.parse()?;
    let manager = Manager::from_config(config, NoTls, ManagerConfig::default());
    Pool::builder(manager)
        .max_size(max_connections)
        .wait_timeout(Some(timeout))
        .create_timeout(Some(timeout))
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(MaroidError::storage)
}

/// Quotes a PostgreSQL identifier.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Statement that scopes unqualified names in the current transaction to
/// `schema`, falling back to `public`.
pub fn search_path_statement(schema: &str) -> String {
    format!("SET LOCAL search_path TO {}, public", quote_ident(schema))
}

/// Database access scoped to one plugin's schema.
///
/// Each transaction opened through [`PluginDatabase::with_transaction`] sets
/// its search path to the plugin schema (`dev_maroid_foo` for
/// `dev.maroid.foo`), so plugin SQL can use unqualified table names.
#[derive(Clone)]
pub struct PluginDatabase {
    db: Arc<Database>,
    schema: String,
}

impl PluginDatabase {
    pub fn new(db: Arc<Database>, plugin: &PluginId) -> Self {
        Self {
            db,
            schema: plugin.to_safe_name("_"),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Runs `f` inside a transaction bound to the plugin schema. Commits when
    /// `f` succeeds and rolls back when it fails.
    ///
    /// ```ignore
    /// pdb.with_transaction(|tx| Box::pin(async move {
    ///     tx.execute("INSERT INTO readings (value) VALUES ($1)", &[&42i32]).await?;
    ///     Ok(())
    /// }))
    /// .await?;
    /// ```
    pub async fn with_transaction<T, F>(&self, f: F) -> Result<T, MaroidError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t Transaction<'t>) -> BoxFuture<'t, Result<T, MaroidError>> + Send,
    {
        let mut conn = self.db.connection().await?;
        let client: &mut Client = &mut conn;
        let tx = client.transaction().await?;
        tx.batch_execute(&search_path_statement(&self.schema))
            .await?;

        let result = f(&tx).await;
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(schema = %self.schema, error = %rollback, "transaction rollback failed");
                }
                Err(e)
            }
        }
    }
}
