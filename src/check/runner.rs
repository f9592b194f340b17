//! Check selection and execution.
//!
//! # Responsibilities
//! - Map a `CheckKind` to its evaluator
//! - Run probe → classify → aggregate
//! - Bound the whole pass by a deadline; a fatal error or an expired
//!   deadline still yields an UNKNOWN outcome

use std::time::Duration;

use crate::broker::BrokerApi;
use crate::cache::JsonFileStore;
use crate::check::{
    aggregate, CheckError, CheckOutcome, DlqEvaluator, Evaluator, ExistsEvaluator,
    HealthEvaluator, QueueAgeEvaluator, QueuePattern, QueueSizeEvaluator, Thresholds,
};

const PASS_GRACE: Duration = Duration::from_secs(1);

/// The check selected for this invocation, with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    QueueAge {
        pattern: QueuePattern,
        thresholds: Thresholds,
    },
    QueueSize {
        pattern: QueuePattern,
        thresholds: Thresholds,
    },
    Health,
    Exists {
        name: String,
    },
    Dlq {
        prefix: String,
        cache_dir: String,
        thresholds: Thresholds,
    },
}

impl CheckKind {
    /// Name printed in front of the plugin status line.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::QueueAge { .. } => "ARTEMIS_QUEUEAGE",
            CheckKind::QueueSize { .. } => "ARTEMIS_QUEUESIZE",
            CheckKind::Health => "ARTEMIS_HEALTH",
            CheckKind::Exists { .. } => "ARTEMIS_EXISTS",
            CheckKind::Dlq { .. } => "ARTEMIS_DLQ",
        }
    }

    /// Deadline of the whole pass given the per-request timeout.
    ///
    /// One second past the request timeout, so a hung request fails on the
    /// client and is reported as a fetch failure before the pass is aborted.
    pub fn deadline(&self, request_timeout: Duration) -> Duration {
        request_timeout + PASS_GRACE
    }

    /// Thresholds the check classifies against, if it takes any.
    pub fn thresholds(&self) -> Option<Thresholds> {
        match self {
            CheckKind::QueueAge { thresholds, .. }
            | CheckKind::QueueSize { thresholds, .. }
            | CheckKind::Dlq { thresholds, .. } => Some(*thresholds),
            CheckKind::Health | CheckKind::Exists { .. } => None,
        }
    }
}

/// Probe, classify and aggregate with one evaluator.
pub async fn evaluate<E: Evaluator>(
    mut evaluator: E,
    broker: &dyn BrokerApi,
) -> Result<CheckOutcome, CheckError> {
    let metrics = evaluator.probe(broker).await?;
    let results: Vec<_> = metrics.iter().map(|m| evaluator.classify(m)).collect();

    let ok_summary = evaluator.summarize_ok(&results);
    let outcome = aggregate(results, ok_summary);
    tracing::info!(
        context = ?evaluator.context(),
        status = %outcome.status,
        results = outcome.results.len(),
        "Check evaluated"
    );
    Ok(outcome)
}

/// Run the selected check once against `broker`.
pub async fn run_check(kind: &CheckKind, broker: &dyn BrokerApi) -> Result<CheckOutcome, CheckError> {
    match kind {
        CheckKind::QueueAge {
            pattern,
            thresholds,
        } => evaluate(QueueAgeEvaluator::new(pattern.clone(), *thresholds), broker).await,
        CheckKind::QueueSize {
            pattern,
            thresholds,
        } => evaluate(QueueSizeEvaluator::new(pattern.clone(), *thresholds), broker).await,
        CheckKind::Health => evaluate(HealthEvaluator::new(), broker).await,
        CheckKind::Exists { name } => evaluate(ExistsEvaluator::new(name.clone()), broker).await,
        CheckKind::Dlq {
            prefix,
            cache_dir,
            thresholds,
        } => {
            let store = JsonFileStore::from_setting(cache_dir);
            tracing::debug!(cache = %store.path().display(), "Using DLQ cache");
            let evaluator = DlqEvaluator::new(prefix.clone(), *thresholds, store)?;
            evaluate(evaluator, broker).await
        }
    }
}

/// Run the check under a deadline, never failing.
pub async fn run_with_timeout(
    kind: &CheckKind,
    broker: &dyn BrokerApi,
    deadline: Duration,
) -> CheckOutcome {
    match tokio::time::timeout(deadline, run_check(kind, broker)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Check aborted");
            CheckOutcome::unknown(e.to_string())
        }
        Err(_) => {
            tracing::warn!(deadline_secs = deadline.as_secs(), "Check deadline expired");
            CheckOutcome::unknown(format!(
                "Timeout: check execution aborted after {} seconds",
                deadline.as_secs()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testing::StubBroker;
    use crate::check::Status;

    #[test]
    fn test_labels_and_deadlines() {
        let age = CheckKind::QueueAge {
            pattern: QueuePattern::all(),
            thresholds: Thresholds::new(1, 2),
        };
        assert_eq!(age.label(), "ARTEMIS_QUEUEAGE");
        assert_eq!(age.deadline(Duration::from_secs(5)), Duration::from_secs(6));
        assert_eq!(CheckKind::Health.deadline(Duration::from_secs(5)), Duration::from_secs(6));
        assert_eq!(age.thresholds(), Some(Thresholds::new(1, 2)));
        assert_eq!(CheckKind::Health.thresholds(), None);
    }

    #[tokio::test]
    async fn test_hung_request_reports_fetch_failure_within_deadline() {
        let mut broker = StubBroker::with_queues(&[]);
        broker.list_delay = Some(Duration::from_secs(1));
        let kind = CheckKind::QueueSize {
            pattern: QueuePattern::all(),
            thresholds: Thresholds::new(10, 100),
        };

        let outcome = run_with_timeout(&kind, &broker, kind.deadline(Duration::from_secs(1))).await;
        assert_eq!(outcome.status, Status::Unknown);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].metric.numeric(), -1);
        assert!(outcome.summary.starts_with("ERROR: Fetching network FAILED"));
    }

    #[tokio::test]
    async fn test_queue_size_scenario() {
        let broker = StubBroker::with_queues(&[("orders", 50)]);
        let kind = CheckKind::QueueSize {
            pattern: QueuePattern::all(),
            thresholds: Thresholds::new(10, 100),
        };
        let outcome = run_check(&kind, &broker).await.unwrap();
        assert_eq!(outcome.status, Status::Warning);
        assert_eq!(outcome.summary, "Queue size is greater than or equal to 10");
    }

    #[tokio::test]
    async fn test_dlq_through_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let kind = CheckKind::Dlq {
            prefix: "DLQ".into(),
            cache_dir: dir.path().to_string_lossy().into_owned(),
            thresholds: Thresholds::new(10, 100),
        };

        let outcome = run_check(&kind, &StubBroker::with_queues(&[("DLQ.orders", 5)]))
            .await
            .unwrap();
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.summary, "First check for DLQ DLQ.orders is 0");

        let outcome = run_check(&kind, &StubBroker::with_queues(&[("DLQ.orders", 8)]))
            .await
            .unwrap();
        assert_eq!(outcome.status, Status::Critical);
        assert_eq!(outcome.summary, "More messages in DLQ.orders is 3");
    }

    #[tokio::test]
    async fn test_corrupt_cache_renders_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(crate::cache::CACHE_SUBDIR);
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join(crate::cache::CACHE_FILE), "[1,2").unwrap();

        let kind = CheckKind::Dlq {
            prefix: "DLQ".into(),
            cache_dir: dir.path().to_string_lossy().into_owned(),
            thresholds: Thresholds::new(10, 100),
        };
        let outcome =
            run_with_timeout(&kind, &StubBroker::with_queues(&[]), Duration::from_secs(5)).await;
        assert_eq!(outcome.status, Status::Unknown);
        assert!(outcome.summary.starts_with("DLQ cache failure"));
    }
}
