//! Check evaluation engine.
//!
//! # Data Flow
//! ```text
//! BrokerApi (+ DlqCacheStore for the DLQ check)
//!     → Evaluator::probe      → Vec<Metric>
//!     → Evaluator::classify   → Vec<CheckResult>   (one per metric)
//!     → summary::aggregate    → CheckOutcome        (worst status wins)
//!     → output                → plugin line + exit code
//! ```
//!
//! # Design Decisions
//! - One `Evaluator` implementation per check kind, selected by `CheckKind`
//! - Broker failures become a `Failed` metric instead of aborting the pass
//! - DLQ cache I/O failures are fatal (`CheckError::Cache`)

pub mod dlq;
pub mod exists;
pub mod health;
pub mod pattern;
pub mod queue_age;
pub mod queue_size;
pub mod runner;
pub mod summary;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::broker::{BrokerApi, FailureKind, FetchError};
use crate::cache::CacheError;

pub use dlq::DlqEvaluator;
pub use exists::ExistsEvaluator;
pub use health::HealthEvaluator;
pub use pattern::QueuePattern;
pub use queue_age::QueueAgeEvaluator;
pub use queue_size::QueueSizeEvaluator;
pub use runner::{run_check, run_with_timeout, CheckKind};
pub use summary::{aggregate, CheckOutcome};

/// Plugin service state. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Standard monitoring-plugin exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which evaluator produced a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Age,
    Size,
    Health,
    Exists,
    Dlq,
}

impl Context {
    /// Whether metrics of this context are exported as performance data.
    pub fn has_perfdata(&self) -> bool {
        matches!(self, Context::Age | Context::Size | Context::Dlq)
    }

    fn missing_key_label(&self) -> &'static str {
        match self {
            Context::Health => "Getting Values FAILED",
            _ => "Getting Queue(s) FAILED",
        }
    }
}

/// Value carried by a metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    /// A measured number (minutes, messages, delta, lookup code).
    Value(i64),
    /// A boolean broker attribute.
    Flag(bool),
    /// The probe could not obtain a value.
    Failed(FailureKind),
}

/// One measurement emitted by a probe pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    pub context: Context,
    /// Lower bound reported in performance data.
    pub min: Option<i64>,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: i64, context: Context) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Value(value),
            context,
            min: None,
        }
    }

    pub fn flag(name: impl Into<String>, value: bool, context: Context) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Flag(value),
            context,
            min: None,
        }
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sentinel metric describing a broker failure.
    pub fn failed(context: Context, error: &FetchError) -> Self {
        let kind = error.kind();
        let label = match kind {
            FailureKind::Network => "Fetching network FAILED",
            FailureKind::Decode => "Decoding Json FAILED",
            FailureKind::MissingKey => context.missing_key_label(),
            FailureKind::Unexpected => "Unexpected Error",
        };
        Self {
            name: format!("{}: {}", label, error),
            value: MetricValue::Failed(kind),
            context,
            min: None,
        }
    }

    /// Numeric view of the value; failures read as -1.
    pub fn numeric(&self) -> i64 {
        match self.value {
            MetricValue::Value(v) => v,
            MetricValue::Flag(b) => i64::from(b),
            MetricValue::Failed(_) => -1,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.value, MetricValue::Failed(_))
    }
}

/// Warning/critical bounds; a value at or above a bound violates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub warn: i64,
    pub crit: i64,
}

impl Thresholds {
    pub fn new(warn: i64, crit: i64) -> Self {
        Self { warn, crit }
    }

    /// `warn` above `crit`: the warning band can never be reached.
    pub fn is_inverted(&self) -> bool {
        self.warn > self.crit
    }

    /// Classify a measured value. Critical is checked first.
    pub fn classify(&self, value: i64) -> Status {
        if value < 0 {
            Status::Unknown
        } else if value >= self.crit {
            Status::Critical
        } else if value >= self.warn {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

/// Classification of one metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
    pub metric: Metric,
    /// Bounds exported with the performance data, if any.
    pub thresholds: Option<Thresholds>,
}

impl CheckResult {
    pub fn new(status: Status, message: impl Into<String>, metric: &Metric) -> Self {
        Self {
            status,
            message: message.into(),
            metric: metric.clone(),
            thresholds: None,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// UNKNOWN result for a sentinel metric.
    pub fn failure(metric: &Metric) -> Self {
        Self::new(Status::Unknown, format!("ERROR: {}", metric.name), metric)
    }
}

/// Fatal evaluator errors that cannot be expressed as a metric.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("DLQ cache failure: {0}")]
    Cache(#[from] CacheError),
}

/// One check kind: gathers metrics, classifies them, summarizes the pass.
#[async_trait]
pub trait Evaluator: Send {
    fn context(&self) -> Context;

    /// Gather metrics from the broker. Broker failures are returned as
    /// `Failed` metrics; only unrecoverable local failures are errors.
    async fn probe(&mut self, broker: &dyn BrokerApi) -> Result<Vec<Metric>, CheckError>;

    fn classify(&self, metric: &Metric) -> CheckResult;

    /// Summary line when every result is OK; `None` keeps the first result's
    /// message.
    fn summarize_ok(&self, _results: &[CheckResult]) -> Option<String> {
        None
    }
}
