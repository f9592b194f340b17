//! Queue age check: minutes since the oldest message was enqueued.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::broker::BrokerApi;
use crate::check::{
    CheckError, CheckResult, Context, Evaluator, Metric, MetricValue, QueuePattern, Status,
    Thresholds,
};

pub struct QueueAgeEvaluator {
    pattern: QueuePattern,
    thresholds: Thresholds,
}

impl QueueAgeEvaluator {
    pub fn new(pattern: QueuePattern, thresholds: Thresholds) -> Self {
        Self {
            pattern,
            thresholds,
        }
    }

    /// Probe with a fixed "now", shared by every queue of the pass.
    pub async fn probe_at(&self, broker: &dyn BrokerApi, now: DateTime<Utc>) -> Vec<Metric> {
        let queues = match broker.list_queues().await {
            Ok(queues) => queues,
            Err(e) => {
                tracing::warn!(error = %e, "Listing queues failed");
                return vec![Metric::failed(Context::Age, &e)];
            }
        };

        let mut metrics = Vec::new();
        for queue in queues.iter().filter(|q| self.pattern.matches(&q.name)) {
            match broker.oldest_message_timestamp(&queue.name).await {
                Ok(oldest) => {
                    let oldest = oldest.unwrap_or(now);
                    let minutes = (now - oldest).num_seconds().div_euclid(60);
                    tracing::debug!(queue = %queue.name, minutes, "Queue age");
                    metrics.push(Metric::new(&queue.name, minutes, Context::Age).with_min(0));
                }
                Err(e) => {
                    tracing::warn!(queue = %queue.name, error = %e, "Browsing queue failed");
                    metrics.push(Metric::failed(Context::Age, &e));
                    break;
                }
            }
        }
        metrics
    }

    fn limits(&self) -> String {
        format!("(W={},C={})", self.thresholds.warn, self.thresholds.crit)
    }
}

/// Render minutes the way a duration reads: `1 day, 2:05:00`.
pub fn format_minutes(minutes: i64) -> String {
    let days = minutes / (24 * 60);
    let hours = (minutes % (24 * 60)) / 60;
    let mins = minutes % 60;
    match days {
        0 => format!("{}:{:02}:00", hours, mins),
        1 => format!("1 day, {}:{:02}:00", hours, mins),
        _ => format!("{} days, {}:{:02}:00", days, hours, mins),
    }
}

#[async_trait]
impl Evaluator for QueueAgeEvaluator {
    fn context(&self) -> Context {
        Context::Age
    }

    async fn probe(&mut self, broker: &dyn BrokerApi) -> Result<Vec<Metric>, CheckError> {
        let now = Utc::now();
        Ok(self.probe_at(broker, now).await)
    }

    fn classify(&self, metric: &Metric) -> CheckResult {
        let minutes = match metric.value {
            MetricValue::Failed(_) => return CheckResult::failure(metric),
            _ => metric.numeric(),
        };

        let status = self.thresholds.classify(minutes);
        let named = self.pattern.as_str().is_some();
        let message = match status {
            Status::Unknown => format!(
                "ERROR: oldest message of queue {} lies {} minutes in the future",
                metric.name, -minutes
            ),
            Status::Ok if !named => format!(
                "All queues are younger than {} minutes {}",
                self.thresholds.warn,
                self.limits()
            ),
            _ if named => format!(
                "Queue {} is {} old {}",
                metric.name,
                format_minutes(minutes),
                self.limits()
            ),
            _ => format!("Some queue is {} old {}", format_minutes(minutes), self.limits()),
        };

        CheckResult::new(status, message, metric).with_thresholds(self.thresholds)
    }

    fn summarize_ok(&self, results: &[CheckResult]) -> Option<String> {
        let pattern = self.pattern.as_str()?;
        if results.len() < 2 {
            return None;
        }
        Some(format!(
            "All {} queues matching {} are younger than {} minutes {}",
            results.len(),
            pattern,
            self.thresholds.warn,
            self.limits()
        ))
    }
}
