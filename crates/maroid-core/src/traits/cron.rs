// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduled job capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::MaroidError;

/// Identity and schedule of a cron job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJobMeta {
    /// Registry key; must be unique across all plugins.
    pub id: String,
    /// Cron expression, seconds field optional (`*/5 * * * *`, `0 */5 * * * *`).
    pub schedule: String,
}

/// A job executed on a schedule by the cron worker.
#[async_trait]
pub trait CronJob: Send + Sync {
    fn meta(&self) -> CronJobMeta;

    /// Executes one run of the job. `shutdown` is cancelled when the worker
    /// is stopping; long-running jobs should return early when it fires.
    async fn run(&self, shutdown: CancellationToken) -> Result<(), MaroidError>;
}

/// Capability: the plugin contributes scheduled jobs.
pub trait CronProvider: Send + Sync {
    fn cron_jobs(&self) -> Result<Vec<Arc<dyn CronJob>>, MaroidError>;
}
