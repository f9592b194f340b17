//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Reject an unparseable Jolokia URL override
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - `warn > crit` is accepted: crit is evaluated first and wins

use std::fmt;

use crate::config::schema::ProbeConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let conn = &config.connection;

    if conn.port == 0 {
        errors.push(ValidationError::new("connection.port", "must be greater than 0"));
    }
    if conn.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "connection.timeout_secs",
            "must be greater than 0",
        ));
    }
    if conn.broker_name.trim().is_empty() {
        errors.push(ValidationError::new("connection.broker_name", "must not be empty"));
    }
    if let Some(jolokia_url) = &conn.jolokia_url {
        if let Err(e) = url::Url::parse(jolokia_url) {
            errors.push(ValidationError::new(
                "connection.jolokia_url",
                format!("invalid URL '{}': {}", jolokia_url, e),
            ));
        }
    }
    if config.dlq.prefix.is_empty() {
        errors.push(ValidationError::new("dlq.prefix", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
