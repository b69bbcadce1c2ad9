// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Maroid hub.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;
use std::time::Duration;

use maroid_core::PluginConfigMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level Maroid configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MaroidConfig {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub mqtt: MqttConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    /// Plugins to load, in load order.
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` for human-readable lines, `json` for one JSON object per event.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// PostgreSQL connection parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_name")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub database: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Upper bound of the connection pool shared by the host and plugins.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_name(),
            password: String::new(),
            database: default_db_name(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// libpq key/value connection string.
    pub fn dsn(&self) -> String {
        let mut parts = vec![
            format!("host={}", dsn_value(&self.host)),
            format!("port={}", self.port),
            format!("user={}", dsn_value(&self.user)),
            format!("dbname={}", dsn_value(&self.database)),
            format!("connect_timeout={}", self.connect_timeout_secs),
        ];
        if !self.password.is_empty() {
            parts.push(format!("password={}", dsn_value(&self.password)));
        }
        parts.join(" ")
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Quotes a libpq value when it is empty or contains spaces, quotes or backslashes.
fn dsn_value(value: &str) -> String {
    if !value.is_empty() && !value.contains([' ', '\'', '\\']) {
        return value.to_string();
    }
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "maroid".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_connections() -> usize {
    10
}

/// MQTT broker settings for the topic-subscriber worker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MqttConfig {
    /// Broker URL (`tcp://host:port` or `mqtt://host:port`). Empty means not configured.
    #[serde(default)]
    pub broker: String,

    /// Client identifier prefix; the hostname is appended as `<prefix>@<hostname>`.
    #[serde(default = "default_client_id_prefix")]
    pub client_id_prefix: String,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Time allowed for in-flight work to drain on disconnect.
    #[serde(default = "default_disconnect_quiesce_ms")]
    pub disconnect_quiesce_ms: u64,

    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// When set, subscriptions use `$share/<group>/<topic>` so several hub
    /// instances split the message load.
    #[serde(default)]
    pub shared_group: Option<String>,

    /// Delay between reconnect attempts after a connection error.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: String::new(),
            client_id_prefix: default_client_id_prefix(),
            user: None,
            password: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            disconnect_quiesce_ms: default_disconnect_quiesce_ms(),
            keep_alive_secs: default_keep_alive_secs(),
            shared_group: None,
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

/// Host and port of a parsed broker URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
}

impl MqttConfig {
    pub fn is_configured(&self) -> bool {
        !self.broker.trim().is_empty()
    }

    /// Parses `broker`. `Ok(None)` when no broker is configured.
    pub fn endpoint(&self) -> Result<Option<BrokerEndpoint>, String> {
        if !self.is_configured() {
            return Ok(None);
        }
        let url = Url::parse(self.broker.trim())
            .map_err(|e| format!("mqtt.broker `{}` is not a valid URL: {e}", self.broker))?;
        if !matches!(url.scheme(), "tcp" | "mqtt") {
            return Err(format!(
                "mqtt.broker scheme `{}` is not supported (use tcp:// or mqtt://)",
                url.scheme()
            ));
        }
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| format!("mqtt.broker `{}` has no host", self.broker))?;
        Ok(Some(BrokerEndpoint {
            host: host.to_string(),
            port: url.port().unwrap_or(1883),
        }))
    }

    pub fn disconnect_quiesce(&self) -> Duration {
        Duration::from_millis(self.disconnect_quiesce_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_client_id_prefix() -> String {
    "maroid".to_string()
}

fn default_disconnect_quiesce_ms() -> u64 {
    250
}

fn default_keep_alive_secs() -> u64 {
    30
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

/// Worker orchestration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Upper bound for each worker's graceful stop.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl WorkerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

/// Chat subsystem settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Where conversation states live.
    #[serde(default)]
    pub conversation_store: ConversationStoreKind,
}

/// Backend of the conversation state store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStoreKind {
    /// Process memory; users lose their place on restart.
    #[default]
    Memory,
    /// The core `conversation_states` table.
    Postgres,
}

/// One `[[plugins]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginEntry {
    /// Path to the plugin's shared library.
    pub path: PathBuf,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Free-form settings passed to the plugin constructor.
    #[serde(default)]
    pub config: PluginConfigMap,
}

fn default_true() -> bool {
    true
}
