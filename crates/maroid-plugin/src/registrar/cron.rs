// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use maroid_core::{CapabilityKind, MaroidError, Plugin};

use super::{Registrar, not_supported, retrieval};
use crate::registries::{LoadedPlugin, Registries};
use crate::registry::RegisteredCronJob;

/// Registers a plugin's cron jobs under their job IDs.
pub struct CronRegistrar;

impl Registrar for CronRegistrar {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Cron
    }

    fn supports(&self, plugin: &dyn Plugin) -> bool {
        plugin.as_cron_provider().is_some()
    }

    fn register(&self, plugin: &LoadedPlugin, registries: &mut Registries) -> Result<(), MaroidError> {
        let provider = plugin
            .instance
            .as_cron_provider()
            .ok_or_else(|| not_supported(self.kind()))?;
        let jobs = provider.cron_jobs().map_err(retrieval(self.kind()))?;

        registries.cron_jobs.register_all(jobs.into_iter().map(|job| {
            (
                job.meta().id,
                RegisteredCronJob {
                    plugin: plugin.id.clone(),
                    job,
                },
            )
        }))
    }
}
