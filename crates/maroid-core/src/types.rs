// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin identity and metadata types.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::MaroidError;

/// The plugin API version this runtime supports. Plugins must declare exactly this value.
pub const API_VERSION: &str = "v1";

/// Dotted, lowercase identifier grammar: at least two segments, each made of
/// alphanumeric runs joined by single hyphens.
static PLUGIN_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*(\.[a-z0-9]+(-[a-z0-9]+)*)+$")
        .unwrap_or_else(|e| unreachable!("static plugin ID pattern is valid: {e}"))
});

/// A parsed, validated plugin identifier such as `dev.maroid.foo`.
///
/// The last dotted segment is the name; everything before it is the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginId {
    namespace: String,
    name: String,
}

impl PluginId {
    /// Parses and validates a plugin identifier.
    pub fn parse(raw: &str) -> Result<Self, MaroidError> {
        if !PLUGIN_ID_PATTERN.is_match(raw) {
            return Err(MaroidError::InvalidPluginId(if raw.is_empty() {
                "<empty>".to_string()
            } else {
                raw.to_string()
            }));
        }

        // The pattern guarantees at least one dot.
        let (namespace, name) = raw
            .rsplit_once('.')
            .ok_or_else(|| MaroidError::InvalidPluginId(raw.to_string()))?;

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the identifier with every `.` and `-` replaced by `sep`.
    ///
    /// `dev.maroid.foo-bar` becomes `dev_maroid_foo_bar` with `sep = "_"`. Used
    /// for schema names, command group names and chat command prefixes.
    pub fn to_safe_name(&self, sep: &str) -> String {
        self.to_string().replace(['.', '-'], sep)
    }

    /// The topic prefix under which this plugin's subscribers live (`dev/maroid/foo`).
    pub fn topic_namespace(&self) -> String {
        self.to_string().replace('.', "/")
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

impl FromStr for PluginId {
    type Err = MaroidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PluginId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PluginId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Metadata every plugin reports about itself.
///
/// The identifier is kept in its raw form so the loader can reject a plugin
/// whose ID is missing or malformed instead of the plugin failing to build it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub id: String,
    pub version: String,
    pub api_version: String,
}

impl PluginMetadata {
    /// Metadata declaring the API version this crate was built with.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            api_version: API_VERSION.to_string(),
        }
    }
}

/// The capability kinds a plugin may contribute. The string form doubles as
/// the registrar name in logs and errors.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Command,
    Cron,
    Migration,
    ChatCommand,
    ChatConversation,
    TopicSubscriber,
}
