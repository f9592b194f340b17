//! Queue size check: current message count per queue.

use async_trait::async_trait;

use crate::broker::BrokerApi;
use crate::check::{
    CheckError, CheckResult, Context, Evaluator, Metric, MetricValue, QueuePattern, Status,
    Thresholds,
};

pub struct QueueSizeEvaluator {
    pattern: QueuePattern,
    thresholds: Thresholds,
}

impl QueueSizeEvaluator {
    pub fn new(pattern: QueuePattern, thresholds: Thresholds) -> Self {
        Self {
            pattern,
            thresholds,
        }
    }
}

fn violation(bound: i64) -> String {
    format!("Queue size is greater than or equal to {}", bound)
}

#[async_trait]
impl Evaluator for QueueSizeEvaluator {
    fn context(&self) -> Context {
        Context::Size
    }

    async fn probe(&mut self, broker: &dyn BrokerApi) -> Result<Vec<Metric>, CheckError> {
        let queues = match broker.list_queues().await {
            Ok(queues) => queues,
            Err(e) => {
                tracing::warn!(error = %e, "Listing queues failed");
                return Ok(vec![Metric::failed(Context::Size, &e)]);
            }
        };

        Ok(queues
            .iter()
            .filter(|q| self.pattern.matches(&q.name))
            .map(|q| {
                Metric::new(format!("Queue Size of {}", q.name), q.message_count, Context::Size)
                    .with_min(0)
            })
            .collect())
    }

    fn classify(&self, metric: &Metric) -> CheckResult {
        let count = match metric.value {
            MetricValue::Failed(_) => return CheckResult::failure(metric),
            _ => metric.numeric(),
        };

        let status = self.thresholds.classify(count);
        let message = match status {
            Status::Critical => violation(self.thresholds.crit),
            Status::Warning => violation(self.thresholds.warn),
            Status::Unknown => format!("ERROR: {} is negative ({})", metric.name, count),
            Status::Ok => format!("{} is {}", metric.name, count),
        };
        CheckResult::new(status, message, metric).with_thresholds(self.thresholds)
    }

    fn summarize_ok(&self, results: &[CheckResult]) -> Option<String> {
        if results.len() < 2 {
            return None;
        }
        let counts: Vec<i64> = results.iter().map(|r| r.metric.numeric()).collect();
        let min = counts.iter().min()?;
        let max = counts.iter().max()?;
        // Integer average, truncated.
        let avg = counts.iter().sum::<i64>() / counts.len() as i64;
        Some(format!(
            "Checked {} queues with lengths min/avg/max = {}/{}/{}",
            counts.len(),
            min,
            avg,
            max
        ))
    }
}
