//! Wire types for the Jolokia management API and fetch error definitions.
//!
//! Jolokia wraps every answer as `{"status": <int>, "value": <payload>}`.
//! The queue list payload is itself a JSON document encoded as a string.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// One queue as reported by `listQueues`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub name: String,
    pub message_count: i64,
}

/// Routing type of an address lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingType {
    /// Point-to-point queue.
    Anycast,
    /// Publish/subscribe topic.
    Multicast,
}

impl RoutingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingType::Anycast => "anycast",
            RoutingType::Multicast => "multicast",
        }
    }
}

/// Broad class of a fetch failure, used to label sentinel metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Decode,
    MissingKey,
    Unexpected,
}

/// Errors that can occur while talking to the management API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout.
    #[error("{0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Body (or an embedded document) is not valid JSON, or a value has the
    /// wrong shape.
    #[error("{0}")]
    Decode(String),

    /// JSON parsed but an expected field is absent.
    #[error("missing key '{0}'")]
    MissingKey(String),

    #[error("{0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) | FetchError::Status(_) => FailureKind::Network,
            FetchError::Decode(_) => FailureKind::Decode,
            FetchError::MissingKey(_) => FailureKind::MissingKey,
            FetchError::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if e.is_builder() {
            FetchError::Unexpected(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Result type for broker operations.
pub type FetchResult<T> = Result<T, FetchError>;

fn field<'a>(body: &'a Value, key: &str) -> FetchResult<&'a Value> {
    body.get(key)
        .ok_or_else(|| FetchError::MissingKey(key.to_string()))
}

/// Extract the reported `status` of a read response.
pub fn parse_status(body: &Value) -> FetchResult<u16> {
    let status = field(body, "status")?;
    status
        .as_u64()
        .and_then(|s| u16::try_from(s).ok())
        .ok_or_else(|| FetchError::Decode(format!("status is not an integer: {}", status)))
}

/// Decode the `listQueues` answer into queue snapshots.
pub fn parse_queue_list(body: &Value) -> FetchResult<Vec<QueueSnapshot>> {
    let value = field(body, "value")?;

    // The payload is normally a JSON string; some gateways hand it back decoded.
    let document = match value {
        Value::String(raw) if raw.is_empty() => {
            return Err(FetchError::MissingKey("value".to_string()))
        }
        Value::String(raw) => serde_json::from_str::<Value>(raw)?,
        Value::Null => return Err(FetchError::MissingKey("value".to_string())),
        other => other.clone(),
    };

    let data = field(&document, "data")?
        .as_array()
        .ok_or_else(|| FetchError::Decode("'data' is not an array".to_string()))?;

    data.iter()
        .map(|entry| {
            let name = field(entry, "name")?
                .as_str()
                .ok_or_else(|| FetchError::Decode("queue name is not a string".to_string()))?
                .to_string();
            let message_count = parse_count(field(entry, "messageCount")?)?;
            Ok(QueueSnapshot {
                name,
                message_count,
            })
        })
        .collect()
}

fn parse_count(value: &Value) -> FetchResult<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| FetchError::Decode(format!("invalid messageCount: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| FetchError::Decode(format!("invalid messageCount '{}': {}", s, e))),
        other => Err(FetchError::Decode(format!("invalid messageCount: {}", other))),
    }
}

/// Decode a `browse(1, 1)` answer into the timestamp of the oldest message.
///
/// An empty browse result means the queue holds no messages.
pub fn parse_oldest_timestamp(body: &Value) -> FetchResult<Option<DateTime<Utc>>> {
    let messages = match field(body, "value")? {
        Value::Null => return Ok(None),
        Value::Array(messages) => messages,
        other => {
            return Err(FetchError::Decode(format!(
                "browse value is not an array: {}",
                other
            )))
        }
    };

    let Some(first) = messages.first() else {
        return Ok(None);
    };

    match field(first, "timestamp")? {
        Value::String(s) => parse_timestamp(s).map(Some),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(Some)
            .ok_or_else(|| FetchError::Decode(format!("invalid epoch timestamp: {}", n))),
        other => Err(FetchError::Decode(format!("invalid timestamp: {}", other))),
    }
}

/// Parse an ISO-8601 timestamp with a `+hh:mm` (or `+hhmm`) offset.
pub fn parse_timestamp(raw: &str) -> FetchResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Ok(ts.with_timezone(&Utc));
        }
    }
    // Offset-less timestamps are taken as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| FetchError::Decode(format!("invalid timestamp '{}': {}", raw, e)))
}

/// Decode the broker `Started` attribute.
pub fn parse_started(body: &Value) -> FetchResult<bool> {
    match field(body, "value")? {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
        Value::Null => Ok(false),
        other => Err(FetchError::Decode(format!("unexpected Started value: {}", other))),
    }
}
