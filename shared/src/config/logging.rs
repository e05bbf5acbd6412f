//! Logging configuration

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info,mr_core=debug`
    pub level: String,

    pub format: LogFormat,

    /// Prefix events with a timestamp
    pub timestamp: bool,

    /// Record file and line of every event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Preset for a deployment environment. Development traces the
    /// verification core; deployed environments emit JSON for collectors.
    pub fn for_environment(env: Environment) -> Self {
        let (level, format, source_location) = match env {
            Environment::Development => ("info,mr_core=debug,mr_infra=debug", LogFormat::Pretty, true),
            Environment::Staging => ("info", LogFormat::Json, false),
            Environment::Production => ("warn,mr_infra=info", LogFormat::Json, false),
        };

        Self {
            level: level.to_string(),
            format,
            timestamp: true,
            source_location,
        }
    }
}
