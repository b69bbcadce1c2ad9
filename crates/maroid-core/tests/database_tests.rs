// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pool behaviour against a live PostgreSQL server.
//!
//! Skipped unless `MAROID_TEST_DATABASE_DSN` holds a libpq connection string,
//! for example `host=localhost user=postgres dbname=postgres`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use maroid_core::{Database, MaroidError, PluginDatabase, PluginId};

async fn database() -> Option<Arc<Database>> {
    let dsn = std::env::var("MAROID_TEST_DATABASE_DSN").ok()?;
    let db = Database::connect(&dsn, Duration::from_secs(5), 4)
        .await
        .expect("test database reachable");
    Some(Arc::new(db))
}

fn plugin_db(db: &Arc<Database>, id: &str) -> PluginDatabase {
    PluginDatabase::new(Arc::clone(db), &PluginId::parse(id).unwrap())
}

async fn sleep_in_transaction(pdb: PluginDatabase) -> Result<(), MaroidError> {
    pdb.with_transaction(|tx| {
        Box::pin(async move {
            tx.batch_execute("SELECT pg_sleep(0.5)").await?;
            Ok(())
        })
    })
    .await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn plugin_transactions_run_concurrently() {
    let Some(db) = database().await else {
        return;
    };

    let started = Instant::now();
    let (a, b) = tokio::join!(
        tokio::spawn(sleep_in_transaction(plugin_db(&db, "dev.maroid.jasmine"))),
        tokio::spawn(sleep_in_transaction(plugin_db(&db, "dev.maroid.parking"))),
    );
    a.unwrap().unwrap();
    b.unwrap().unwrap();

    let elapsed = started.elapsed();
    assert!(elapsed < Duration::from_millis(900), "took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn host_queries_inside_a_plugin_transaction_do_not_block() {
    let Some(db) = database().await else {
        return;
    };

    let host_db = Arc::clone(&db);
    let plugin = plugin_db(&db, "dev.maroid.jasmine");
    let nested = plugin.with_transaction(move |tx| {
        Box::pin(async move {
            tx.batch_execute("SELECT 1").await?;
            let conn = host_db.connection().await?;
            let row = conn.query_one("SELECT 2::INT4", &[]).await?;
            Ok(row.get::<_, i32>(0))
        })
    });

    let value = tokio::time::timeout(Duration::from_secs(3), nested)
        .await
        .expect("nested host query finished")
        .unwrap();
    assert_eq!(value, 2);
}
