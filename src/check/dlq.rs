//! Dead-letter queue check: new messages since the previous run.
//!
//! # State Machine
//! ```text
//! new()   → store.load() once; missing cache = empty mapping
//! probe() → per queue with the prefix:
//!             previous count absent  → delta 0 ("First check for DLQ")
//!             previous count present → delta = current - previous
//!             mapping[queue] = current; store.save(mapping)
//! ```
//!
//! # Design Decisions
//! - The cache is saved after every queue, so a crash loses at most the
//!   in-flight update
//! - Any growth is CRITICAL; the configured thresholds are carried but the
//!   classifier branches only on the sign of the delta
//! - A shrinking DLQ (e.g. after a purge) is reported, never flagged

use async_trait::async_trait;

use crate::broker::BrokerApi;
use crate::cache::{CacheError, DlqCacheStore, DlqCounts};
use crate::check::{
    CheckError, CheckResult, Context, Evaluator, Metric, MetricValue, Status, Thresholds,
};

pub struct DlqEvaluator<S> {
    prefix: String,
    thresholds: Thresholds,
    store: S,
    counts: DlqCounts,
}

impl<S: DlqCacheStore> DlqEvaluator<S> {
    /// Create the evaluator, loading the previous counts from `store`.
    pub fn new(
        prefix: impl Into<String>,
        thresholds: Thresholds,
        store: S,
    ) -> Result<Self, CacheError> {
        let counts = store.load()?;
        tracing::debug!(
            entries = counts.len(),
            warn = thresholds.warn,
            crit = thresholds.crit,
            "DLQ check initialised; thresholds are not used for classification"
        );
        Ok(Self {
            prefix: prefix.into(),
            thresholds,
            store,
            counts,
        })
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Counts as they stand after the last update.
    pub fn counts(&self) -> &DlqCounts {
        &self.counts
    }
}

#[async_trait]
impl<S: DlqCacheStore> Evaluator for DlqEvaluator<S> {
    fn context(&self) -> Context {
        Context::Dlq
    }

    async fn probe(&mut self, broker: &dyn BrokerApi) -> Result<Vec<Metric>, CheckError> {
        let queues = match broker.list_queues().await {
            Ok(queues) => queues,
            Err(e) => {
                tracing::warn!(error = %e, "Listing queues failed");
                return Ok(vec![Metric::failed(Context::Dlq, &e)]);
            }
        };

        let prefix = self.prefix.clone();
        let mut metrics = Vec::new();
        for queue in queues.iter().filter(|q| q.name.starts_with(&prefix)) {
            let current = queue.message_count;
            let (delta, label) = match self.counts.get(&queue.name) {
                None => (0, "First check for DLQ"),
                Some(&previous) => {
                    let delta = current - previous;
                    let label = match delta {
                        0 => "No additional messages in",
                        d if d > 0 => "More messages in",
                        _ => "Less messages in",
                    };
                    (delta, label)
                }
            };

            self.counts.insert(queue.name.clone(), current);
            self.store.save(&self.counts)?;

            tracing::debug!(queue = %queue.name, current, delta, "DLQ observed");
            metrics.push(Metric::new(format!("{} {}", label, queue.name), delta, Context::Dlq));
        }
        Ok(metrics)
    }

    fn classify(&self, metric: &Metric) -> CheckResult {
        let delta = match metric.value {
            MetricValue::Failed(_) => return CheckResult::failure(metric),
            _ => metric.numeric(),
        };
        let status = if delta > 0 {
            Status::Critical
        } else {
            Status::Ok
        };
        CheckResult::new(status, format!("{} is {}", metric.name, delta), metric)
    }

    fn summarize_ok(&self, results: &[CheckResult]) -> Option<String> {
        if results.len() < 2 {
            return None;
        }
        let grown = results.iter().filter(|r| r.metric.numeric() > 0).count();
        Some(format!(
            "Checked {} DLQs of which {} contain additional messages.",
            results.len(),
            grown
        ))
    }
}
