// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `cron` worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use croner::Cron;
use maroid_core::{CronJob, MaroidError};
use maroid_plugin::registry::{CronRegistry, RegisteredCronJob};
use maroid_worker::Worker;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::schedule::{next_after, parse_schedule, until};

/// A job with its parsed schedule and skip-if-running guard.
struct ScheduledJob {
    id: String,
    plugin: String,
    cron: Cron,
    job: Arc<dyn CronJob>,
    running: Arc<AtomicBool>,
}

/// Runs registered cron jobs on their schedules.
pub struct CronWorker {
    jobs: Vec<RegisteredCronJob>,
    scheduled: Mutex<Vec<Arc<ScheduledJob>>>,
    runs: TaskTracker,
}

impl CronWorker {
    pub fn new(registry: &CronRegistry) -> Self {
        Self {
            jobs: registry.values().cloned().collect(),
            scheduled: Mutex::new(Vec::new()),
            runs: TaskTracker::new(),
        }
    }

    fn scheduled(&self) -> Result<Vec<Arc<ScheduledJob>>, MaroidError> {
        self.scheduled
            .lock()
            .map(|jobs| jobs.clone())
            .map_err(|_| MaroidError::Internal("cron schedule lock poisoned".to_string()))
    }
}

#[async_trait]
impl Worker for CronWorker {
    fn name(&self) -> &'static str {
        "cron"
    }

    async fn prepare(&self) -> Result<(), MaroidError> {
        let mut scheduled = Vec::with_capacity(self.jobs.len());
        for entry in &self.jobs {
            let meta = entry.job.meta();
            let cron = parse_schedule(&meta.schedule).map_err(|e| {
                MaroidError::Config(format!(
                    "scheduling cron job {} with {:?}: {e}",
                    meta.id, meta.schedule
                ))
            })?;
            info!(
                job_id = %meta.id,
                plugin = %entry.plugin,
                schedule = %meta.schedule,
                "cron job registered successfully"
            );
            scheduled.push(Arc::new(ScheduledJob {
                id: meta.id,
                plugin: entry.plugin.to_string(),
                cron,
                job: Arc::clone(&entry.job),
                running: Arc::new(AtomicBool::new(false)),
            }));
        }

        *self
            .scheduled
            .lock()
            .map_err(|_| MaroidError::Internal("cron schedule lock poisoned".to_string()))? =
            scheduled;
        Ok(())
    }

    async fn start(&self, shutdown: CancellationToken) -> Result<(), MaroidError> {
        let scheduled = self.scheduled()?;
        if scheduled.is_empty() {
            info!("no cron jobs registered, skipping");
            return Ok(());
        }

        // The loops are tracked alongside the runs they spawn, so `stop`
        // also waits for any run a loop starts on its way out.
        let mut loops = JoinSet::new();
        for job in scheduled {
            let schedule = schedule_loop(job, self.runs.clone(), shutdown.clone());
            loops.spawn(self.runs.track_future(schedule));
        }
        info!(jobs = loops.len(), "cron scheduler started");

        let mut failure = None;
        while let Some(joined) = loops.join_next().await {
            let result = joined
                .map_err(|e| MaroidError::Internal(format!("cron schedule task failed: {e}")))
                .and_then(|r| r);
            if let Err(e) = result {
                error!(error = %e, "cron scheduler failed");
                shutdown.cancel();
                failure.get_or_insert(e);
            }
        }
        failure.map_or(Ok(()), Err)
    }

    async fn stop(&self) -> Result<(), MaroidError> {
        info!("stopping cron scheduler");
        self.runs.close();
        self.runs.wait().await;
        info!("all cron jobs have stopped");
        Ok(())
    }
}

/// Fires one job on its schedule until `shutdown` is cancelled.
async fn schedule_loop(
    job: Arc<ScheduledJob>,
    runs: TaskTracker,
    shutdown: CancellationToken,
) -> Result<(), MaroidError> {
    let mut last: Option<DateTime<Utc>> = None;

    loop {
        let now = Utc::now();
        // Stepping from the previous fire time keeps one run per occurrence
        // even when the wall clock lags behind the timer.
        let from = last.filter(|l| *l > now).unwrap_or(now);
        let next = next_after(&job.cron, from)?;
        debug!(job_id = %job.id, next = %next, "next cron run scheduled");

        tokio::select! {
            biased;
            () = shutdown.cancelled() => return Ok(()),
            () = tokio::time::sleep(until(next, now)) => {}
        }
        if shutdown.is_cancelled() {
            return Ok(());
        }
        last = Some(next);

        if job.running.swap(true, Ordering::AcqRel) {
            warn!(job_id = %job.id, "previous cron job execution still running, skipping");
            continue;
        }

        let guard = RunningGuard(Arc::clone(&job.running));
        let job = Arc::clone(&job);
        let token = shutdown.clone();
        runs.spawn(async move {
            let _guard = guard;
            execute(&job, token).await;
        });
    }
}

/// Clears a job's running flag when its run ends, panics included.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn execute(job: &ScheduledJob, shutdown: CancellationToken) {
    info!(job_id = %job.id, plugin = %job.plugin, "cron job execution started");
    match job.job.run(shutdown).await {
        Ok(()) => info!(job_id = %job.id, "cron job execution completed successfully"),
        Err(e) => error!(job_id = %job.id, error = %e, "cron job execution failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use maroid_test_utils::RecordingCronJob;

    fn scheduled(job: &Arc<RecordingCronJob>) -> Arc<ScheduledJob> {
        Arc::new(ScheduledJob {
            id: "tick".to_string(),
            plugin: "dev.maroid.cron".to_string(),
            cron: parse_schedule("* * * * * *").unwrap(),
            job: Arc::clone(job) as Arc<dyn CronJob>,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_at_fire_time_starts_no_run() {
        // Both select branches are ready at once; repeat so a random pick
        // would eventually start a run.
        for _ in 0..16 {
            let job = RecordingCronJob::new("tick", "* * * * * *").shared();
            let runs = TaskTracker::new();
            let token = CancellationToken::new();
            let handle = tokio::spawn(schedule_loop(scheduled(&job), runs.clone(), token.clone()));

            tokio::task::yield_now().await;
            token.cancel();
            tokio::time::advance(Duration::from_secs(2)).await;
            handle.await.unwrap().unwrap();

            runs.close();
            runs.wait().await;
            assert_eq!(job.runs(), 0);
        }
    }
}
