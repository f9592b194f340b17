//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the probe.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the broker probe.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// How to reach the Jolokia management endpoint.
    pub connection: ConnectionConfig,

    /// Default warning/critical thresholds for threshold-based checks.
    pub thresholds: ThresholdConfig,

    /// Dead-letter queue check settings.
    pub dlq: DlqConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Connection configuration for the management API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Use https instead of http.
    pub ssl: bool,

    /// Broker hostname.
    pub host: String,

    /// Management console port.
    pub port: u16,

    /// Broker name as registered in JMX.
    pub broker_name: String,

    /// Path of the Jolokia servlet below the console root.
    pub url_tail: String,

    /// Complete Jolokia URL. Host, port, url_tail and credentials are
    /// ignored when this is set.
    pub jolokia_url: Option<String>,

    /// Admin account user.
    pub user: String,

    /// Admin account password.
    pub password: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ssl: false,
            host: "localhost".to_string(),
            port: 8161,
            broker_name: "localhost".to_string(),
            url_tail: "console/jolokia".to_string(),
            jolokia_url: None,
            user: "admin".to_string(),
            password: "admin".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Warning and critical thresholds, both inclusive lower bounds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub warn: i64,
    pub crit: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { warn: 10, crit: 100 }
    }
}

/// Dead-letter queue check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DlqConfig {
    /// Queue name prefix identifying dead-letter queues.
    pub prefix: String,

    /// Base directory of the delta cache (`~` is expanded).
    pub cache_dir: String,
}

impl Default for DlqConfig {
    fn default() -> Self {
        Self {
            prefix: "DLQ".to_string(),
            cache_dir: "~/.cache".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). Logs go to stderr.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
