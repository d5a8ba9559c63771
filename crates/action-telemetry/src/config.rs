//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

use crate::TelemetryError;

/// Configuration for logging and tracing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error, or an `EnvFilter` directive)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Deployment environment (dev, staging, prod)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "action-core".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            environment: "dev".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ACTION_SERVICE_NAME` or `OTEL_SERVICE_NAME`: Service name (default: action-core)
    /// - `ACTION_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `ACTION_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `ACTION_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `ACTION_ENVIRONMENT`: Environment name (default: dev)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from a JSON document. Missing fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self, TelemetryError> {
        serde_json::from_str(raw).map_err(|e| TelemetryError::Config(e.to_string()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("ACTION_SERVICE_NAME")
                .or_else(|| lookup("OTEL_SERVICE_NAME"))
                .unwrap_or(defaults.service_name),

            log_level: lookup("ACTION_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("ACTION_CONSOLE_OUTPUT")
                .map_or(defaults.console_output, |v| {
                    v.to_lowercase() != "false" && v != "0"
                }),

            json_logs: lookup("ACTION_JSON_LOGS")
                .map_or(is_container, |v| v.to_lowercase() == "true" || v == "1"),

            environment: lookup("ACTION_ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "action-core");
        assert_eq!(config.log_level, "info");
        assert!(config.console_output);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[
            ("OTEL_SERVICE_NAME", "registry"),
            ("RUST_LOG", "debug"),
            ("ACTION_JSON_LOGS", "1"),
            ("ACTION_CONSOLE_OUTPUT", "false"),
            ("ACTION_ENVIRONMENT", "prod"),
        ]));

        assert_eq!(config.service_name, "registry");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert!(!config.console_output);
        assert_eq!(config.environment, "prod");
    }

    #[test]
    fn test_action_vars_take_precedence() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[
            ("ACTION_SERVICE_NAME", "primary"),
            ("OTEL_SERVICE_NAME", "fallback"),
            ("ACTION_LOG_LEVEL", "warn"),
            ("RUST_LOG", "trace"),
        ]));
        assert_eq!(config.service_name, "primary");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_container_defaults_to_json() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[("DOCKER_CONTAINER", "1")]));
        assert!(config.json_logs);
    }

    #[test]
    fn test_from_json_partial() {
        let config = TelemetryConfig::from_json(r#"{"log_level": "debug"}"#).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.service_name, "action-core");

        assert!(TelemetryConfig::from_json("not json").is_err());
    }
}
