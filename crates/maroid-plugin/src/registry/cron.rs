// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use maroid_core::{CronJob, PluginId};

use super::Registry;

/// Cron jobs keyed by job ID.
pub type CronRegistry = Registry<RegisteredCronJob>;

#[derive(Clone)]
pub struct RegisteredCronJob {
    pub plugin: PluginId,
    pub job: Arc<dyn CronJob>,
}
