// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Maroid hub and its plugins.
//!
//! Variants are grouped by the phase that produces them: loading, capability
//! registration, planning, steady-state runtime, and shutdown. Startup-phase
//! errors always abort the process; runtime errors from a single cron run or
//! topic message are logged and isolated by the workers.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::CapabilityKind;

/// Boxed error type accepted as a `source` by several variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across the hub and the plugin API.
#[derive(Debug, Error)]
pub enum MaroidError {
    // --- load / ABI ---
    /// The plugin library could not be opened.
    #[error("cannot open plugin {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// The library does not export the plugin declaration symbol.
    #[error("cannot find symbol `{symbol}` in plugin {}: {reason}", path.display())]
    SymbolNotFound {
        path: PathBuf,
        symbol: String,
        reason: String,
    },

    /// The declaration symbol exists but cannot be trusted to have the expected shape.
    #[error("plugin symbol has unexpected type: `{symbol}` ({}): {detail}", path.display())]
    UnexpectedSymbolType {
        path: PathBuf,
        symbol: String,
        detail: String,
    },

    /// The plugin identifier is absent or does not match the identifier grammar.
    #[error("plugin ID is missing or invalid: {0}")]
    InvalidPluginId(String),

    /// The plugin was built against a different plugin API version.
    #[error("incompatible plugin API version: plugin {plugin} built for API {found}, expected {expected}")]
    IncompatibleApiVersion {
        plugin: String,
        found: String,
        expected: String,
    },

    // --- registration ---
    /// A plugin with the same canonical ID has already been loaded.
    #[error("plugin already registered: {0}")]
    PluginAlreadyRegistered(String),

    /// A registry already holds an entry under this key.
    #[error("{kind} already registered: {key}")]
    AlreadyRegistered { kind: CapabilityKind, key: String },

    /// A subscriber declared a relative topic that cannot be namespaced.
    #[error("invalid topic `{topic}`: {reason}")]
    InvalidTopic { topic: String, reason: &'static str },

    /// The plugin failed to hand over its contributions for a capability.
    #[error("retrieving {capability} contributions: {source}")]
    CapabilityRetrieval {
        capability: CapabilityKind,
        #[source]
        source: Box<MaroidError>,
    },

    /// Wraps any registration failure with the offending plugin and capability.
    #[error("registering capabilities for plugin {plugin} via {capability}: {source}")]
    Registration {
        plugin: String,
        capability: CapabilityKind,
        #[source]
        source: Box<MaroidError>,
    },

    // --- planning ---
    /// `migrate up --target` named neither `core`, `all`, nor a registered plugin.
    #[error("unknown migration target: {0}")]
    UnknownMigrationTarget(String),

    /// `worker --workers` named a worker that does not exist.
    #[error("unknown worker type: {name:?} (available: {available})")]
    UnknownWorkerType { name: String, available: String },

    // --- runtime ---
    /// Subscribers are registered but no broker endpoint is configured.
    #[error("mqtt broker not configured: {0}")]
    MqttBrokerNotConfigured(String),

    /// No conversation is registered under the requested ID.
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    /// A conversation references a step that it does not define.
    #[error("step {step} not found in conversation {conversation}")]
    ConversationStepNotFound { conversation: String, step: String },

    /// No chat command is registered under the requested token.
    #[error("unknown chat command: /{0}")]
    UnknownChatCommand(String),

    /// A host service is not available in this process.
    #[error("{0} is not available")]
    Unavailable(&'static str),

    /// Invalid configuration detected outside the config loader.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or query failure.
    #[error("storage error: {source}")]
    Storage {
        #[source]
        source: BoxError,
    },

    /// Applying one component's migrations failed.
    #[error("migrating {component} failed: {source}")]
    Migration {
        component: String,
        #[source]
        source: BoxError,
    },

    /// A worker failed permanently.
    #[error("worker {worker} failed: {source}")]
    Worker {
        worker: String,
        #[source]
        source: Box<MaroidError>,
    },

    /// Network transport failure (broker connection, subscription).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// An error returned by plugin code.
    #[error("plugin error: {message}")]
    Plugin {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MaroidError {
    /// Shorthand for plugin code reporting a failure without an underlying cause.
    pub fn plugin(message: impl Into<String>) -> Self {
        Self::Plugin {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a database driver error.
    pub fn storage(source: impl Into<BoxError>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Wraps this error with the plugin and capability whose registration failed.
    pub fn in_registration(self, plugin: impl Into<String>, capability: CapabilityKind) -> Self {
        Self::Registration {
            plugin: plugin.into(),
            capability,
            source: Box::new(self),
        }
    }
}

impl From<tokio_postgres::Error> for MaroidError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::storage(err)
    }
}
