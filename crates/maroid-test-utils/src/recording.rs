// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability values that record how they were invoked.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use maroid_core::{
    ChatCommand, ChatCommandMeta, ChatCommandScope, ChatUpdate, CronJob, CronJobMeta, MaroidError,
    PluginCommand, QoS, SubscriberMeta, TopicSubscriber,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// A cron job that counts runs and tracks how many overlap.
pub struct RecordingCronJob {
    meta: CronJobMeta,
    duration: Duration,
    fail: bool,
    runs: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingCronJob {
    pub fn new(id: &str, schedule: &str) -> Self {
        Self {
            meta: CronJobMeta {
                id: id.to_string(),
                schedule: schedule.to_string(),
            },
            duration: Duration::ZERO,
            fail: false,
            runs: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Each run sleeps this long (or until shutdown).
    pub fn taking(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Every run returns an error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous runs observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CronJob for RecordingCronJob {
    fn meta(&self) -> CronJobMeta {
        self.meta.clone()
    }

    async fn run(&self, shutdown: CancellationToken) -> Result<(), MaroidError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.duration.is_zero() {
            tokio::select! {
                () = tokio::time::sleep(self.duration) => {}
                () = shutdown.cancelled() => {}
            }
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail {
            Err(MaroidError::plugin(format!("{} failed", self.meta.id)))
        } else {
            Ok(())
        }
    }
}

/// A topic subscriber that stores every message it receives.
pub struct RecordingSubscriber {
    meta: SubscriberMeta,
    fail: bool,
    received: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSubscriber {
    pub fn new(id: &str, topic: &str) -> Self {
        Self {
            meta: SubscriberMeta {
                id: id.to_string(),
                topic: topic.to_string(),
                qos: QoS::AtLeastOnce,
            },
            fail: false,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Received `(relative topic, payload)` pairs in arrival order.
    pub async fn received(&self) -> Vec<(String, Vec<u8>)> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl TopicSubscriber for RecordingSubscriber {
    fn meta(&self) -> SubscriberMeta {
        self.meta.clone()
    }

    async fn handle(&self, topic: &str, payload: &[u8]) -> Result<(), MaroidError> {
        self.received
            .lock()
            .await
            .push((topic.to_string(), payload.to_vec()));
        if self.fail {
            return Err(MaroidError::plugin("subscriber failed"));
        }
        Ok(())
    }
}

/// A CLI command with one optional positional argument that records it.
pub struct RecordingCommand {
    name: String,
    invocations: Mutex<Vec<Option<String>>>,
}

impl RecordingCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The `target` argument of every invocation.
    pub async fn invocations(&self) -> Vec<Option<String>> {
        self.invocations.lock().await.clone()
    }
}

#[async_trait]
impl PluginCommand for RecordingCommand {
    fn command(&self) -> clap::Command {
        clap::Command::new(self.name.clone())
            .about(format!("Records `{}` invocations", self.name))
            .arg(clap::Arg::new("target"))
    }

    async fn run(&self, matches: &clap::ArgMatches) -> Result<(), MaroidError> {
        let target = matches.get_one::<String>("target").cloned();
        self.invocations.lock().await.push(target);
        Ok(())
    }
}

/// A chat command that records handled updates. Updates whose text contains
/// `forbidden` fail validation.
pub struct RecordingChatCommand {
    meta: ChatCommandMeta,
    handled: Mutex<Vec<ChatUpdate>>,
}

impl RecordingChatCommand {
    pub fn new(command: &str, description: &str) -> Self {
        Self {
            meta: ChatCommandMeta {
                command: command.to_string(),
                description: description.to_string(),
                scope: ChatCommandScope::Default,
            },
            handled: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn handled(&self) -> Vec<ChatUpdate> {
        self.handled.lock().await.clone()
    }
}

#[async_trait]
impl ChatCommand for RecordingChatCommand {
    fn meta(&self) -> ChatCommandMeta {
        self.meta.clone()
    }

    fn validate(&self, update: &ChatUpdate) -> Result<(), MaroidError> {
        if update.text().contains("forbidden") {
            return Err(MaroidError::plugin("forbidden argument"));
        }
        Ok(())
    }

    async fn handle(&self, update: &ChatUpdate) -> Result<(), MaroidError> {
        self.handled.lock().await.push(update.clone());
        Ok(())
    }
}
