// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-running background workers and their orchestration.
//!
//! A worker moves through `prepare` → `start` → `stop`. The [`WorkerGroup`]
//! prepares every selected worker before starting any, runs all starts
//! concurrently under one cancellation token, and stops every worker with a
//! bounded timeout once that token fires.

pub mod group;
pub mod shutdown;

use async_trait::async_trait;
use maroid_core::MaroidError;
use tokio_util::sync::CancellationToken;

pub use group::{WorkerGroup, select_workers};
pub use shutdown::install_signal_handler;

/// Name accepted by [`select_workers`] to run every worker.
pub const ALL_WORKERS: &str = "all";

/// A background worker.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Stable lowercase identifier used for selection (`cron`, `mqtt`).
    fn name(&self) -> &'static str;

    /// Validates configuration and performs static setup. Runs for every
    /// selected worker before any worker starts.
    async fn prepare(&self) -> Result<(), MaroidError>;

    /// Runs the main loop until `shutdown` is cancelled or a permanent
    /// failure occurs. Returning `Ok` early means there is nothing to do.
    async fn start(&self, shutdown: CancellationToken) -> Result<(), MaroidError>;

    /// Drains in-flight work. The caller bounds this with the shutdown timeout.
    async fn stop(&self) -> Result<(), MaroidError>;
}
