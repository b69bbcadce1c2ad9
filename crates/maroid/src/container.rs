// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dependency container.
//!
//! Every service is built on first request and memoised. A failed build
//! leaves its cell empty, so the next request tries again.

use std::sync::Arc;

use maroid_chat::{Engine, MemoryStore, PostgresConversationStore};
use maroid_config::{ConversationStoreKind, MaroidConfig};
use maroid_core::{ConversationEngine, ConversationStore, Database, Host, MaroidError, Plugin};
use maroid_cron::CronWorker;
use maroid_mqtt::MqttWorker;
use maroid_plugin::{CORE_COMPONENT, Loader, Registries};
use maroid_storage::core_migrations;
use maroid_worker::Worker;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::host::PluginHost;

pub struct Container {
    config: MaroidConfig,
    builtin: Vec<Arc<dyn Plugin>>,
    registries: OnceCell<Arc<Registries>>,
    database: OnceCell<Arc<Database>>,
    conversation_engine: OnceCell<Arc<dyn ConversationEngine>>,
}

impl Container {
    pub fn new(config: MaroidConfig) -> Arc<Self> {
        Self::with_builtin(config, Vec::new())
    }

    /// A container that registers `builtin` plugins ahead of the configured
    /// plugin libraries.
    pub fn with_builtin(config: MaroidConfig, builtin: Vec<Arc<dyn Plugin>>) -> Arc<Self> {
        Arc::new(Self {
            config,
            builtin,
            registries: OnceCell::new(),
            database: OnceCell::new(),
            conversation_engine: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &MaroidConfig {
        &self.config
    }

    /// Loads every enabled plugin. Any failure aborts loading as a whole.
    pub async fn registries(self: &Arc<Self>) -> Result<Arc<Registries>, MaroidError> {
        self.registries
            .get_or_try_init(|| async {
                let host: Arc<dyn Host> = Arc::new(PluginHost::new(Arc::downgrade(self)));
                let mut loader = Loader::new(host);
                loader
                    .registries_mut()
                    .migrations
                    .register(CORE_COMPONENT, core_migrations())?;

                for plugin in &self.builtin {
                    loader.register_instance(Arc::clone(plugin))?;
                }
                for entry in &self.config.plugins {
                    if !entry.enabled {
                        debug!(path = %entry.path.display(), "plugin disabled, skipping");
                        continue;
                    }
                    loader.load(&entry.path, entry.config.clone())?;
                }

                let registries = loader.finish();
                info!(plugins = registries.plugins.len(), "plugins loaded");
                Ok(Arc::new(registries))
            })
            .await
            .cloned()
    }

    pub async fn database(&self) -> Result<Arc<Database>, MaroidError> {
        self.database
            .get_or_try_init(|| async {
                let config = &self.config.database;
                let db = Database::connect(
                    &config.dsn(),
                    config.connect_timeout(),
                    config.max_connections,
                )
                .await?;
                info!(host = %config.host, database = %config.database, "connected to database");
                Ok(Arc::new(db))
            })
            .await
            .cloned()
    }

    /// The conversation engine over the loaded conversations.
    ///
    /// Only available once plugins are loaded; a plugin asking for it from
    /// its constructor gets [`MaroidError::Unavailable`].
    pub async fn conversation_engine(&self) -> Result<Arc<dyn ConversationEngine>, MaroidError> {
        let registries = self
            .registries
            .get()
            .cloned()
            .ok_or(MaroidError::Unavailable("conversation engine"))?;

        self.conversation_engine
            .get_or_try_init(|| async {
                let store: Arc<dyn ConversationStore> = match self.config.chat.conversation_store {
                    ConversationStoreKind::Memory => Arc::new(MemoryStore::new()),
                    ConversationStoreKind::Postgres => {
                        Arc::new(PostgresConversationStore::new(self.database().await?))
                    }
                };
                Ok(Arc::new(Engine::new(registries, store)) as Arc<dyn ConversationEngine>)
            })
            .await
            .cloned()
    }

    /// Every worker the hub can run, in the order they are listed to users.
    pub async fn workers(self: &Arc<Self>) -> Result<Vec<Arc<dyn Worker>>, MaroidError> {
        let registries = self.registries().await?;
        Ok(vec![
            Arc::new(CronWorker::new(&registries.cron_jobs)) as Arc<dyn Worker>,
            Arc::new(MqttWorker::new(
                self.config.mqtt.clone(),
                &registries.topic_subscribers,
            )) as Arc<dyn Worker>,
        ])
    }

    /// Releases held resources.
    pub fn close(&self) {
        if let Some(db) = self.database.get() {
            db.close();
            debug!("database connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use maroid_config::PluginEntry;
    use maroid_core::{PluginConfigMap, Step};
    use maroid_test_utils::{MockPlugin, RecordingCronJob, ScriptedConversation, ScriptedStep};

    use super::*;

    #[tokio::test]
    async fn core_migrations_are_registered_first() {
        let container = Container::with_builtin(
            MaroidConfig::default(),
            vec![MockPlugin::new("dev.maroid.foo")
                .migrations(maroid_core::MigrationSource::Embedded(Vec::new()))
                .into_arc()],
        );
        let registries = container.registries().await.unwrap();
        let components: Vec<_> = registries.migrations.keys().collect();
        assert_eq!(components, ["core", "dev.maroid.foo"]);
    }

    #[tokio::test]
    async fn registries_are_memoised() {
        let container = Container::new(MaroidConfig::default());
        let first = container.registries().await.unwrap();
        let second = container.registries().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn disabled_plugins_are_not_opened() {
        let mut config = MaroidConfig::default();
        config.plugins.push(PluginEntry {
            path: PathBuf::from("/nonexistent/libmaroid_missing.so"),
            enabled: false,
            config: PluginConfigMap::new(),
        });
        let container = Container::new(config);
        let registries = container.registries().await.unwrap();
        assert!(registries.plugins.is_empty());
    }

    #[tokio::test]
    async fn failed_load_can_be_retried() {
        let mut config = MaroidConfig::default();
        config.plugins.push(PluginEntry {
            path: PathBuf::from("/nonexistent/libmaroid_missing.so"),
            enabled: true,
            config: PluginConfigMap::new(),
        });
        let container = Container::new(config);
        assert!(matches!(
            container.registries().await,
            Err(MaroidError::Load { .. })
        ));
        assert!(matches!(
            container.registries().await,
            Err(MaroidError::Load { .. })
        ));
    }

    #[tokio::test]
    async fn conversation_engine_needs_loaded_plugins() {
        let container = Container::new(MaroidConfig::default());
        assert!(matches!(
            container.conversation_engine().await,
            Err(MaroidError::Unavailable("conversation engine"))
        ));

        container.registries().await.unwrap();
        let first = container.conversation_engine().await.unwrap();
        let second = container.conversation_engine().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn plugins_reach_the_engine_through_the_host() {
        let step = ScriptedStep::new("ask", None).shared();
        let container = Container::with_builtin(
            MaroidConfig::default(),
            vec![MockPlugin::new("dev.maroid.foo")
                .conversation(ScriptedConversation::new("greet", vec![step.clone() as Arc<dyn Step>]).shared())
                .into_arc()],
        );
        let registries = container.registries().await.unwrap();
        let host = PluginHost::new(Arc::downgrade(&container));
        let engine = host.conversation_engine().await.unwrap();

        let update = maroid_test_utils::chat_update(7, "hi");
        let conversation = registries.chat_conversations.keys().next().unwrap().to_string();
        engine.start(&update, &conversation).await.unwrap();
        assert_eq!(step.entered().await, 1);
    }

    #[tokio::test]
    async fn host_outliving_container_reports_unavailable() {
        let container = Container::new(MaroidConfig::default());
        let host = PluginHost::new(Arc::downgrade(&container));
        drop(container);
        assert!(matches!(
            host.database().await,
            Err(MaroidError::Unavailable("host container"))
        ));
    }

    #[tokio::test]
    async fn workers_are_cron_then_mqtt() {
        let container = Container::with_builtin(
            MaroidConfig::default(),
            vec![MockPlugin::new("dev.maroid.foo")
                .cron_job(RecordingCronJob::new("tick", "* * * * *").shared())
                .into_arc()],
        );
        let names: Vec<_> = container
            .workers()
            .await
            .unwrap()
            .iter()
            .map(|w| w.name())
            .collect();
        assert_eq!(names, ["cron", "mqtt"]);
    }
}
