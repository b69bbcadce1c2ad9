// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maroid worker`.

use std::sync::Arc;

use maroid_core::MaroidError;
use maroid_worker::{WorkerGroup, install_signal_handler, select_workers};
use tracing::info;

use crate::container::Container;

/// Runs the requested workers until a signal arrives or one of them fails.
pub async fn run(container: &Arc<Container>, requested: &[String]) -> Result<(), MaroidError> {
    let available = container.workers().await?;
    let selected = select_workers(&available, requested)?;
    let group = WorkerGroup::new(selected, container.config().worker.shutdown_timeout());

    info!(workers = ?group.worker_names(), "starting workers");
    group.run(install_signal_handler()).await?;
    info!("all workers stopped");
    Ok(())
}
