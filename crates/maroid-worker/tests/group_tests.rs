// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle ordering and failure handling of the worker group.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use maroid_core::MaroidError;
use maroid_worker::{Worker, WorkerGroup, select_workers};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, PartialEq)]
enum StartMode {
    /// Blocks until cancelled.
    Block,
    /// Returns immediately with nothing to do.
    Idle,
    /// Fails after the given delay.
    FailAfter(Duration),
}

type Journal = Arc<Mutex<Vec<String>>>;

struct RecordingWorker {
    name: &'static str,
    journal: Journal,
    mode: StartMode,
    fail_prepare: bool,
    hang_on_stop: bool,
    stops: AtomicUsize,
}

impl RecordingWorker {
    fn new(name: &'static str, journal: &Journal, mode: StartMode) -> Self {
        Self {
            name,
            journal: Arc::clone(journal),
            mode,
            fail_prepare: false,
            hang_on_stop: false,
            stops: AtomicUsize::new(0),
        }
    }

    fn failing_prepare(mut self) -> Self {
        self.fail_prepare = true;
        self
    }

    fn hanging_stop(mut self) -> Self {
        self.hang_on_stop = true;
        self
    }

    fn record(&self, event: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{event}", self.name));
    }
}

#[async_trait]
impl Worker for RecordingWorker {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn prepare(&self) -> Result<(), MaroidError> {
        self.record("prepare");
        if self.fail_prepare {
            return Err(MaroidError::Config("broker missing".into()));
        }
        Ok(())
    }

    async fn start(&self, shutdown: CancellationToken) -> Result<(), MaroidError> {
        self.record("start");
        match self.mode {
            StartMode::Block => {
                shutdown.cancelled().await;
                self.record("cancelled");
                Ok(())
            }
            StartMode::Idle => Ok(()),
            StartMode::FailAfter(delay) => {
                tokio::time::sleep(delay).await;
                Err(MaroidError::plugin("connection lost"))
            }
        }
    }

    async fn stop(&self) -> Result<(), MaroidError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.record("stop");
        if self.hang_on_stop {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn events(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

fn position(events: &[String], event: &str) -> usize {
    events
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("{event} missing from {events:?}"))
}

#[tokio::test]
async fn every_prepare_runs_before_any_start() {
    let log = journal();
    let cron: Arc<dyn Worker> = Arc::new(RecordingWorker::new("cron", &log, StartMode::Idle));
    let mqtt: Arc<dyn Worker> = Arc::new(RecordingWorker::new("mqtt", &log, StartMode::Idle));
    let group = WorkerGroup::new(vec![cron, mqtt], Duration::from_secs(1));

    group.run(CancellationToken::new()).await.unwrap();

    let events = events(&log);
    let last_prepare = position(&events, "mqtt:prepare");
    assert!(last_prepare < position(&events, "cron:start"));
    assert!(last_prepare < position(&events, "mqtt:start"));
    // Idle workers are still stopped once the group winds down.
    assert!(events.contains(&"cron:stop".to_string()));
    assert!(events.contains(&"mqtt:stop".to_string()));
}

#[tokio::test]
async fn unknown_worker_is_rejected_before_prepare() {
    let log = journal();
    let available: Vec<Arc<dyn Worker>> = vec![
        Arc::new(RecordingWorker::new("cron", &log, StartMode::Idle)),
        Arc::new(RecordingWorker::new("mqtt", &log, StartMode::Idle)),
    ];

    let Err(err) = select_workers(&available, &["nonexistent".to_string()]) else {
        panic!("unknown worker name accepted");
    };
    assert!(err.to_string().contains("available: cron, mqtt"), "{err}");
    assert!(events(&log).is_empty());
}

#[tokio::test]
async fn prepare_failure_aborts_before_start() {
    let log = journal();
    let ok: Arc<dyn Worker> = Arc::new(RecordingWorker::new("cron", &log, StartMode::Block));
    let bad: Arc<dyn Worker> =
        Arc::new(RecordingWorker::new("mqtt", &log, StartMode::Block).failing_prepare());
    let group = WorkerGroup::new(vec![ok, bad], Duration::from_secs(1));

    let err = group.run(CancellationToken::new()).await.unwrap_err();
    assert!(matches!(&err, MaroidError::Worker { worker, .. } if worker == "mqtt"), "{err}");
    assert!(!events(&log).iter().any(|e| e.ends_with(":start")));
}

#[tokio::test(start_paused = true)]
async fn first_failure_cancels_the_group_and_is_returned() {
    let log = journal();
    let blocking = Arc::new(RecordingWorker::new("cron", &log, StartMode::Block));
    let failing = Arc::new(RecordingWorker::new(
        "mqtt",
        &log,
        StartMode::FailAfter(Duration::from_millis(50)),
    ));
    let group = WorkerGroup::new(
        vec![
            blocking.clone() as Arc<dyn Worker>,
            failing.clone() as Arc<dyn Worker>,
        ],
        Duration::from_secs(1),
    );

    let err = group.run(CancellationToken::new()).await.unwrap_err();
    assert!(err.to_string().contains("connection lost"), "{err}");

    let events = events(&log);
    assert!(events.contains(&"cron:cancelled".to_string()));
    assert_eq!(blocking.stops.load(Ordering::SeqCst), 1);
    assert_eq!(failing.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn root_cancellation_stops_running_workers() {
    let log = journal();
    let worker = Arc::new(RecordingWorker::new("cron", &log, StartMode::Block));
    let group = WorkerGroup::new(vec![worker.clone() as Arc<dyn Worker>], Duration::from_secs(1));

    let root = CancellationToken::new();
    let trigger = root.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    group.run(root).await.unwrap();
    assert_eq!(worker.stops.load(Ordering::SeqCst), 1);
    assert!(events(&log).contains(&"cron:cancelled".to_string()));
}

#[tokio::test(start_paused = true)]
async fn stop_timeout_is_not_an_error() {
    let log = journal();
    let slow = Arc::new(RecordingWorker::new("cron", &log, StartMode::Block).hanging_stop());
    let next = Arc::new(RecordingWorker::new("mqtt", &log, StartMode::Block));
    let group = WorkerGroup::new(
        vec![
            slow.clone() as Arc<dyn Worker>,
            next.clone() as Arc<dyn Worker>,
        ],
        Duration::from_secs(10),
    );

    let root = CancellationToken::new();
    root.cancel();
    group.run(root).await.unwrap();

    // The hanging stop does not prevent the next worker from being stopped.
    assert_eq!(slow.stops.load(Ordering::SeqCst), 1);
    assert_eq!(next.stops.load(Ordering::SeqCst), 1);
}
