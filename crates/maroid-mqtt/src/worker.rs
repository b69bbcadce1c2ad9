// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `mqtt` worker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use maroid_config::MqttConfig;
use maroid_core::{MaroidError, QoS};
use maroid_plugin::registry::TopicSubscriberRegistry;
use maroid_worker::Worker;
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::route::Route;

/// Capacity of the request channel between the client and its event loop.
const REQUEST_CAPACITY: usize = 64;

/// Connection state while the worker is running.
struct Session {
    client: AsyncClient,
    event_loop: JoinHandle<()>,
    closing: CancellationToken,
}

/// Connects to the broker and dispatches messages to topic subscribers.
pub struct MqttWorker {
    config: MqttConfig,
    routes: Arc<Vec<Route>>,
    handlers: TaskTracker,
    session: Mutex<Option<Session>>,
}

impl MqttWorker {
    pub fn new(config: MqttConfig, registry: &TopicSubscriberRegistry) -> Self {
        let routes = Route::from_registry(registry, config.shared_group.as_deref());
        Self {
            config,
            routes: Arc::new(routes),
            handlers: TaskTracker::new(),
            session: Mutex::new(None),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    fn options(&self) -> Result<MqttOptions, MaroidError> {
        let endpoint = self
            .config
            .endpoint()
            .map_err(MaroidError::Config)?
            .ok_or_else(|| MaroidError::MqttBrokerNotConfigured("mqtt.broker is not set".into()))?;

        let host = hostname::get().map_err(|e| MaroidError::Transport {
            message: "getting hostname".to_string(),
            source: Some(Box::new(e)),
        })?;
        let client_id = format!(
            "{}@{}",
            self.config.client_id_prefix,
            host.to_string_lossy()
        );

        let mut options = MqttOptions::new(client_id, endpoint.host, endpoint.port);
        options.set_keep_alive(self.config.keep_alive());
        options.set_clean_session(true);
        if let Some(user) = &self.config.user {
            options.set_credentials(user, self.config.password.clone().unwrap_or_default());
        }
        Ok(options)
    }
}

#[async_trait]
impl Worker for MqttWorker {
    fn name(&self) -> &'static str {
        "mqtt"
    }

    async fn prepare(&self) -> Result<(), MaroidError> {
        if !self.routes.is_empty() && !self.config.is_configured() {
            return Err(MaroidError::MqttBrokerNotConfigured(
                "subscribers are registered but mqtt.broker is not set".to_string(),
            ));
        }
        Ok(())
    }

    async fn start(&self, shutdown: CancellationToken) -> Result<(), MaroidError> {
        if self.routes.is_empty() {
            info!("no MQTT subscribers registered, skipping");
            return Ok(());
        }

        let options = self.options()?;
        let connected_rx = {
            let mut session = self.session.lock().await;
            // The group cancels before it stops workers, so a cancelled token
            // here means `stop` may already have found no session to close.
            if shutdown.is_cancelled() {
                return Ok(());
            }

            let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
            let closing = CancellationToken::new();
            let (connected_tx, connected_rx) = tokio::sync::oneshot::channel();

            let driver = tokio::spawn(drive(
                event_loop,
                EventContext {
                    client: client.clone(),
                    routes: Arc::clone(&self.routes),
                    handlers: self.handlers.clone(),
                    closing: closing.clone(),
                    reconnect_delay: self.config.reconnect_delay(),
                    subscribe_timeout: self.config.connect_timeout(),
                    connected: Some(connected_tx),
                },
            ));

            *session = Some(Session {
                client,
                event_loop: driver,
                closing,
            });
            connected_rx
        };

        tokio::select! {
            connected = tokio::time::timeout(self.config.connect_timeout(), connected_rx) => {
                match connected {
                    Ok(Ok(())) => info!(broker = %self.config.broker, "connected to MQTT broker"),
                    _ => warn!(
                        broker = %self.config.broker,
                        "MQTT broker not reachable yet, retrying in the background"
                    ),
                }
            }
            () = shutdown.cancelled() => return Ok(()),
        }

        shutdown.cancelled().await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), MaroidError> {
        let Some(session) = self.session.lock().await.take() else {
            return Ok(());
        };

        info!("disconnecting from MQTT broker");
        session.closing.cancel();
        if let Err(e) = session.client.try_disconnect() {
            debug!(error = %e, "disconnect request not queued");
        }

        let quiesce = self.config.disconnect_quiesce();
        let mut event_loop = session.event_loop;
        if tokio::time::timeout(quiesce, &mut event_loop).await.is_err() {
            event_loop.abort();
        }

        self.handlers.close();
        if tokio::time::timeout(quiesce, self.handlers.wait())
            .await
            .is_err()
        {
            warn!("MQTT message handlers still running after disconnect");
        }
        Ok(())
    }
}

struct EventContext {
    client: AsyncClient,
    routes: Arc<Vec<Route>>,
    handlers: TaskTracker,
    closing: CancellationToken,
    reconnect_delay: Duration,
    subscribe_timeout: Duration,
    connected: Option<tokio::sync::oneshot::Sender<()>>,
}

/// Polls the event loop until the worker disconnects. Polling again after
/// an error reconnects.
async fn drive(mut event_loop: EventLoop, mut ctx: EventContext) {
    loop {
        // Once connected, closing waits for the queued disconnect to go out.
        let never_connected = ctx.connected.is_some();
        let event = tokio::select! {
            event = event_loop.poll() => event,
            () = ctx.closing.cancelled(), if never_connected => return,
        };

        match event {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code != ConnectReturnCode::Success {
                    warn!(code = ?ack.code, "MQTT broker refused connection");
                    continue;
                }
                if let Some(connected) = ctx.connected.take() {
                    let _ = connected.send(());
                } else {
                    info!("reconnected to MQTT broker");
                }
                // Subscribing from a separate task keeps the event loop
                // draining the request channel.
                tokio::spawn(subscribe_all(
                    ctx.client.clone(),
                    Arc::clone(&ctx.routes),
                    ctx.subscribe_timeout,
                ));
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                dispatch(&ctx, &publish.topic, &publish.payload);
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!("MQTT disconnect sent");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                if ctx.closing.is_cancelled() {
                    return;
                }
                warn!(error = %e, retry_in = ?ctx.reconnect_delay, "MQTT connection error");
                tokio::select! {
                    () = tokio::time::sleep(ctx.reconnect_delay) => {}
                    () = ctx.closing.cancelled() => return,
                }
            }
        }
    }
}

async fn subscribe_all(client: AsyncClient, routes: Arc<Vec<Route>>, timeout: Duration) {
    for route in routes.iter() {
        let request = client.subscribe(route.subscribe_topic.as_str(), to_mqtt_qos(route.qos));
        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(())) => info!(
                subscriber_id = %route.subscriber_id,
                effective_topic = %route.effective_topic,
                subscribe_topic = %route.subscribe_topic,
                qos = route.qos as u8,
                "subscribed to MQTT topic"
            ),
            Ok(Err(e)) => error!(
                subscribe_topic = %route.subscribe_topic,
                error = %e,
                "subscribing to MQTT topic failed"
            ),
            Err(_) => error!(
                subscribe_topic = %route.subscribe_topic,
                "subscribing to MQTT topic timed out"
            ),
        }
    }
}

/// Spawns one handler task per matching route.
fn dispatch(ctx: &EventContext, topic: &str, payload: &[u8]) {
    let mut matched = false;
    for route in ctx.routes.iter() {
        let Some(relative) = route.relative(topic) else {
            continue;
        };
        matched = true;

        let route = route.clone();
        let topic = topic.to_string();
        let relative = relative.to_string();
        let payload = payload.to_vec();
        ctx.handlers.spawn(async move {
            if let Err(e) = route.subscriber.handle(&relative, &payload).await {
                error!(
                    subscriber_id = %route.subscriber_id,
                    topic = %topic,
                    relative_topic = %relative,
                    error = %e,
                    "mqtt subscriber handle error"
                );
            }
        });
    }

    if !matched {
        debug!(topic, "MQTT message matched no subscriber");
    }
}

fn to_mqtt_qos(qos: QoS) -> rumqttc::QoS {
    match qos {
        QoS::AtMostOnce => rumqttc::QoS::AtMostOnce,
        QoS::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
        QoS::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maroid_plugin::Loader;
    use maroid_test_utils::{MockHost, MockPlugin, RecordingSubscriber};

    #[tokio::test]
    async fn dispatch_strips_namespace_and_isolates_failures() {
        let soil = RecordingSubscriber::new("soil", "measurement/+").shared();
        let broken = RecordingSubscriber::new("broken", "measurement/#")
            .failing()
            .shared();
        let plugin = MockPlugin::new("dev.maroid.jasmine")
            .subscriber(soil.clone())
            .subscriber(broken.clone());
        let mut loader = Loader::new(MockHost::shared());
        loader.register_instance(plugin.into_arc()).unwrap();
        let registries = loader.finish();

        let (client, _event_loop) =
            AsyncClient::new(MqttOptions::new("test", "localhost", 1883), 8);
        let ctx = EventContext {
            client,
            routes: Arc::new(Route::from_registry(&registries.topic_subscribers, None)),
            handlers: TaskTracker::new(),
            closing: CancellationToken::new(),
            reconnect_delay: Duration::from_secs(1),
            subscribe_timeout: Duration::from_secs(1),
            connected: None,
        };

        dispatch(&ctx, "dev/maroid/jasmine/measurement/soil", b"42");
        dispatch(&ctx, "dev/maroid/jasmine/measurement/soil/raw", b"7");
        dispatch(&ctx, "dev/maroid/rose/measurement/soil", b"0");
        ctx.handlers.close();
        ctx.handlers.wait().await;

        assert_eq!(
            soil.received().await,
            vec![("measurement/soil".to_string(), b"42".to_vec())]
        );
        assert_eq!(broken.received().await.len(), 2);
    }

    fn worker_with_subscriber() -> MqttWorker {
        let plugin = MockPlugin::new("dev.maroid.jasmine")
            .subscriber(RecordingSubscriber::new("soil", "measurement/+").shared());
        let mut loader = Loader::new(MockHost::shared());
        loader.register_instance(plugin.into_arc()).unwrap();
        let registries = loader.finish();
        let config = MqttConfig {
            broker: "tcp://127.0.0.1:1".into(),
            ..MqttConfig::default()
        };
        MqttWorker::new(config, &registries.topic_subscribers)
    }

    #[tokio::test]
    async fn start_after_stop_opens_no_session() {
        let worker = worker_with_subscriber();
        worker.prepare().await.unwrap();

        let token = CancellationToken::new();
        token.cancel();
        worker.stop().await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), worker.start(token))
            .await
            .expect("start blocked on a cancelled token")
            .unwrap();
        assert!(worker.session.lock().await.is_none());
    }

    #[tokio::test]
    async fn stop_tears_down_the_session() {
        let worker = Arc::new(worker_with_subscriber());
        worker.prepare().await.unwrap();

        let token = CancellationToken::new();
        let started = tokio::spawn({
            let worker = Arc::clone(&worker);
            let token = token.clone();
            async move { worker.start(token).await }
        });
        while worker.session.lock().await.is_none() {
            tokio::task::yield_now().await;
        }

        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), worker.stop())
            .await
            .expect("stop timed out")
            .unwrap();
        started.await.unwrap().unwrap();
        assert!(worker.session.lock().await.is_none());
    }

    #[test]
    fn qos_maps_one_to_one() {
        assert_eq!(to_mqtt_qos(QoS::AtMostOnce), rumqttc::QoS::AtMostOnce);
        assert_eq!(to_mqtt_qos(QoS::AtLeastOnce), rumqttc::QoS::AtLeastOnce);
        assert_eq!(to_mqtt_qos(QoS::ExactlyOnce), rumqttc::QoS::ExactlyOnce);
    }
}
