// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::MaroidConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MaroidConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "log.level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.log.level
        )));
    }

    if !LOG_FORMATS.contains(&config.log.format.as_str()) {
        errors.push(ConfigError::validation(format!(
            "log.format must be one of {}, got `{}`",
            LOG_FORMATS.join(", "),
            config.log.format
        )));
    }

    if config.database.port == 0 {
        errors.push(ConfigError::validation("database.port must not be 0"));
    }

    if config.database.max_connections == 0 {
        errors.push(ConfigError::validation(
            "database.max_connections must be at least 1",
        ));
    }

    if let Err(message) = config.mqtt.endpoint() {
        errors.push(ConfigError::validation(message));
    }

    if let Some(group) = &config.mqtt.shared_group {
        if group.trim().is_empty() {
            errors.push(ConfigError::validation(
                "mqtt.shared_group must not be empty when set",
            ));
        } else if group.contains(['/', '+', '#']) {
            errors.push(ConfigError::validation(format!(
                "mqtt.shared_group `{group}` must not contain `/`, `+` or `#`"
            )));
        }
    }

    for (i, plugin) in config.plugins.iter().enumerate() {
        if plugin.path.as_os_str().is_empty() {
            errors.push(ConfigError::validation(format!(
                "plugins[{i}].path must not be empty"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&MaroidConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = MaroidConfig::default();
        config.log.level = "verbose".into();
        config.log.format = "xml".into();
        config.database.port = 0;
        config.database.max_connections = 0;
        config.mqtt.shared_group = Some("a/b".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn unsupported_broker_scheme_is_rejected() {
        let config: MaroidConfig = toml::from_str(
            r#"
[mqtt]
broker = "ws://broker.local:9001"
"#,
        )
        .unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("scheme `ws` is not supported"));
    }

    #[test]
    fn plugin_tables_pass_through() {
        let config: MaroidConfig = toml::from_str(
            r#"
[[plugins]]
path = "/usr/lib/maroid/libjasmine.so"

[plugins.config]
sensor = "soil-1"
interval_secs = 30

[[plugins]]
path = ""
enabled = false
"#,
        )
        .unwrap();
        assert_eq!(config.plugins[0].config["sensor"], "soil-1");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("plugins[1].path"));
    }
}
