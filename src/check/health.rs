//! Broker health check: the `Started` flag.
//!
//! Boolean, not threshold based: started is OK, anything else CRITICAL.

use async_trait::async_trait;

use crate::broker::BrokerApi;
use crate::check::{CheckError, CheckResult, Context, Evaluator, Metric, MetricValue, Status};

#[derive(Debug, Default)]
pub struct HealthEvaluator;

impl HealthEvaluator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Evaluator for HealthEvaluator {
    fn context(&self) -> Context {
        Context::Health
    }

    async fn probe(&mut self, broker: &dyn BrokerApi) -> Result<Vec<Metric>, CheckError> {
        let metric = match broker.is_started().await {
            Ok(started) => Metric::flag("Started", started, Context::Health),
            Err(e) => {
                tracing::warn!(error = %e, "Reading Started attribute failed");
                Metric::failed(Context::Health, &e)
            }
        };
        Ok(vec![metric])
    }

    fn classify(&self, metric: &Metric) -> CheckResult {
        let started = match metric.value {
            MetricValue::Failed(_) => return CheckResult::failure(metric),
            MetricValue::Flag(b) => b,
            MetricValue::Value(v) => v != 0,
        };
        let status = if started { Status::Ok } else { Status::Critical };
        CheckResult::new(status, format!("{} {}", metric.name, started), metric)
    }
}
