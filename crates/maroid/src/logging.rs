// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup.

use maroid_config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Directives applied when `RUST_LOG` is not set. The MQTT and Postgres
/// drivers are chatty at debug level, so they stay at `warn` unless asked for.
pub fn default_directives(level: &str) -> String {
    format!("{level},rumqttc=warn,tokio_postgres=warn")
}

/// Installs the global subscriber. `RUST_LOG` overrides `log.level`.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let directives = default_directives(level);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
        }
    }
}
