// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Worker selection and the fail-fast worker group.

use std::sync::Arc;
use std::time::Duration;

use maroid_core::MaroidError;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{ALL_WORKERS, Worker};

/// Picks the workers named in `names` from `available`.
///
/// `all` anywhere in `names` selects every worker. An unknown name fails
/// with [`MaroidError::UnknownWorkerType`] listing the available names.
pub fn select_workers(
    available: &[Arc<dyn Worker>],
    names: &[String],
) -> Result<Vec<Arc<dyn Worker>>, MaroidError> {
    if names.is_empty() || names.iter().any(|n| n.trim() == ALL_WORKERS) {
        return Ok(available.to_vec());
    }

    let mut selected: Vec<Arc<dyn Worker>> = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()) {
        let worker = available
            .iter()
            .find(|w| w.name() == name)
            .ok_or_else(|| MaroidError::UnknownWorkerType {
                name: name.to_string(),
                available: available
                    .iter()
                    .map(|w| w.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        if !selected.iter().any(|w| w.name() == name) {
            selected.push(Arc::clone(worker));
        }
    }
    Ok(selected)
}

/// Runs a set of workers under one cancellation token.
pub struct WorkerGroup {
    workers: Vec<Arc<dyn Worker>>,
    shutdown_timeout: Duration,
}

impl WorkerGroup {
    pub fn new(workers: Vec<Arc<dyn Worker>>, shutdown_timeout: Duration) -> Self {
        Self {
            workers,
            shutdown_timeout,
        }
    }

    pub fn worker_names(&self) -> Vec<&'static str> {
        self.workers.iter().map(|w| w.name()).collect()
    }

    /// Prepares every worker, then runs them until `shutdown` fires or one
    /// of them fails.
    ///
    /// The first start error cancels the rest of the group and is returned
    /// once every worker has exited. Every worker is stopped before this
    /// returns; a stop that exceeds the shutdown timeout is only logged.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), MaroidError> {
        for worker in &self.workers {
            info!(worker = worker.name(), "preparing worker");
            worker.prepare().await.map_err(|e| MaroidError::Worker {
                worker: worker.name().to_string(),
                source: Box::new(e),
            })?;
        }

        let group = shutdown.child_token();
        let watcher = tokio::spawn(stop_on_cancel(
            self.workers.clone(),
            group.clone(),
            self.shutdown_timeout,
        ));

        let mut running = JoinSet::new();
        for worker in &self.workers {
            info!(worker = worker.name(), "starting worker");
            let worker = Arc::clone(worker);
            let token = group.clone();
            running.spawn(async move {
                worker.start(token).await.map_err(|e| MaroidError::Worker {
                    worker: worker.name().to_string(),
                    source: Box::new(e),
                })
            });
        }

        let mut first_error = None;
        while let Some(joined) = running.join_next().await {
            let result = joined
                .map_err(|e| MaroidError::Internal(format!("worker task panicked: {e}")))
                .and_then(|r| r);
            if let Err(e) = result {
                if first_error.is_none() {
                    error!(error = %e, "worker failed, cancelling worker group");
                    group.cancel();
                    first_error = Some(e);
                } else {
                    warn!(error = %e, "additional worker failure during shutdown");
                }
            }
        }

        // Every start has returned; make sure the watcher stops the workers.
        group.cancel();
        if let Err(e) = watcher.await {
            error!(error = %e, "worker shutdown task failed");
        }

        first_error.map_or(Ok(()), Err)
    }
}

async fn stop_on_cancel(
    workers: Vec<Arc<dyn Worker>>,
    token: CancellationToken,
    timeout: Duration,
) {
    token.cancelled().await;
    info!("termination signal received, shutting down workers");

    for worker in &workers {
        match tokio::time::timeout(timeout, worker.stop()).await {
            Ok(Ok(())) => info!(worker = worker.name(), "worker stopped"),
            Ok(Err(e)) => error!(worker = worker.name(), error = %e, "worker stop failed"),
            Err(_) => warn!(
                worker = worker.name(),
                timeout_secs = timeout.as_secs(),
                "worker stop timed out"
            ),
        }
    }
}
