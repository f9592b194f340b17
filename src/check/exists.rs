//! Existence check for a queue or topic by exact name.

use async_trait::async_trait;

use crate::broker::{BrokerApi, RoutingType};
use crate::check::{CheckError, CheckResult, Context, Evaluator, Metric, MetricValue, Status};

/// Lookup outcome codes carried as the metric value.
pub const NOT_FOUND: i64 = 0;
pub const FOUND_QUEUE: i64 = 1;
pub const FOUND_TOPIC: i64 = 2;

const FOUND: u16 = 200;

pub struct ExistsEvaluator {
    name: String,
}

impl ExistsEvaluator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Evaluator for ExistsEvaluator {
    fn context(&self) -> Context {
        Context::Exists
    }

    async fn probe(&mut self, broker: &dyn BrokerApi) -> Result<Vec<Metric>, CheckError> {
        let lookups = [
            (RoutingType::Anycast, FOUND_QUEUE),
            (RoutingType::Multicast, FOUND_TOPIC),
        ];

        for (routing, code) in lookups {
            match broker.lookup_status(&self.name, routing).await {
                Ok(FOUND) => return Ok(vec![Metric::new("exists", code, Context::Exists)]),
                Ok(status) => {
                    tracing::debug!(name = %self.name, routing = routing.as_str(), status, "Not found");
                }
                Err(e) => {
                    tracing::warn!(name = %self.name, error = %e, "Address lookup failed");
                    return Ok(vec![Metric::failed(Context::Exists, &e)]);
                }
            }
        }
        Ok(vec![Metric::new("exists", NOT_FOUND, Context::Exists)])
    }

    fn classify(&self, metric: &Metric) -> CheckResult {
        let code = match metric.value {
            MetricValue::Failed(_) => return CheckResult::failure(metric),
            _ => metric.numeric(),
        };

        let (status, message) = match code {
            c if c < 0 => (Status::Unknown, format!("ERROR: invalid lookup result {}", c)),
            NOT_FOUND => (
                Status::Critical,
                format!("Neither Queue nor Topic with name {} were found!", self.name),
            ),
            FOUND_QUEUE => (Status::Ok, format!("Found Queue with name {}", self.name)),
            FOUND_TOPIC => (Status::Ok, format!("Found Topic with name {}", self.name)),
            other => (Status::Ok, format!("{} is {}", metric.name, other)),
        };
        CheckResult::new(status, message, metric)
    }
}
