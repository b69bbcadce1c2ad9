// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron worker scheduling behaviour under paused time.

use std::sync::Arc;
use std::time::Duration;

use maroid_core::{CronJob, MaroidError};
use maroid_cron::CronWorker;
use maroid_plugin::{Loader, Registries};
use maroid_test_utils::{MockHost, MockPlugin, RecordingCronJob};
use maroid_worker::Worker;
use tokio_util::sync::CancellationToken;

fn registries(jobs: &[Arc<RecordingCronJob>]) -> Registries {
    let mut plugin = MockPlugin::new("dev.maroid.cron");
    for job in jobs {
        plugin = plugin.cron_job(Arc::clone(job) as Arc<dyn CronJob>);
    }
    let mut loader = Loader::new(MockHost::shared());
    loader.register_instance(plugin.into_arc()).unwrap();
    loader.finish()
}

/// Runs the worker for `span` of (virtual) time, then cancels and stops it.
async fn run_for(worker: Arc<CronWorker>, span: Duration) -> Result<(), MaroidError> {
    worker.prepare().await?;
    let token = CancellationToken::new();
    let started = tokio::spawn({
        let worker = Arc::clone(&worker);
        let token = token.clone();
        async move { worker.start(token).await }
    });

    tokio::time::sleep(span).await;
    token.cancel();
    started.await.expect("start task panicked")?;
    worker.stop().await
}

#[tokio::test(start_paused = true)]
async fn overlapping_runs_are_skipped() {
    let job = RecordingCronJob::new("slow-sync", "* * * * * *")
        .taking(Duration::from_secs(5))
        .shared();
    let registries = registries(&[job.clone()]);
    let worker = Arc::new(CronWorker::new(&registries.cron_jobs));

    run_for(worker, Duration::from_secs(12)).await.unwrap();

    assert!(job.runs() >= 1, "job never ran");
    assert_eq!(job.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn failing_job_keeps_its_schedule() {
    let job = RecordingCronJob::new("flaky", "* * * * * *").failing().shared();
    let registries = registries(&[job.clone()]);
    let worker = Arc::new(CronWorker::new(&registries.cron_jobs));

    run_for(worker, Duration::from_secs(10)).await.unwrap();

    assert!(job.runs() >= 2, "scheduler stopped after a failure: {} runs", job.runs());
}

#[tokio::test(start_paused = true)]
async fn jobs_are_scheduled_independently() {
    let fast = RecordingCronJob::new("fast", "* * * * * *").shared();
    let blocked = RecordingCronJob::new("blocked", "* * * * * *")
        .taking(Duration::from_secs(60))
        .shared();
    let registries = registries(&[fast.clone(), blocked.clone()]);
    let worker = Arc::new(CronWorker::new(&registries.cron_jobs));

    run_for(worker, Duration::from_secs(10)).await.unwrap();

    assert_eq!(blocked.runs(), 1);
    assert!(fast.runs() >= 2);
}

#[tokio::test]
async fn empty_registry_returns_immediately() {
    let registries = Registries::new();
    let worker = CronWorker::new(&registries.cron_jobs);
    worker.prepare().await.unwrap();

    // Not cancelled: start must still return on its own.
    tokio::time::timeout(Duration::from_secs(1), worker.start(CancellationToken::new()))
        .await
        .expect("start blocked with no jobs")
        .unwrap();
    worker.stop().await.unwrap();
}

#[tokio::test]
async fn invalid_schedule_fails_prepare() {
    let job = RecordingCronJob::new("broken", "every tuesday").shared();
    let registries = registries(&[job]);
    let worker = CronWorker::new(&registries.cron_jobs);

    let err = worker.prepare().await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("broken"), "{msg}");
    assert!(msg.contains("every tuesday"), "{msg}");
}

#[test]
fn worker_name_is_cron() {
    let registries = Registries::new();
    assert_eq!(CronWorker::new(&registries.cron_jobs).name(), "cron");
}
