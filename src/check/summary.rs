//! Result aggregation: many per-metric results into one check outcome.

use crate::check::{CheckResult, Status};

/// Overall outcome of one probe pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub status: Status,
    pub summary: String,
    pub results: Vec<CheckResult>,
}

impl CheckOutcome {
    /// Outcome for a pass that produced no classifiable result.
    pub fn unknown(summary: impl Into<String>) -> Self {
        Self {
            status: Status::Unknown,
            summary: summary.into(),
            results: Vec::new(),
        }
    }

    /// The first result carrying the overall status.
    pub fn first_significant(&self) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.status == self.status)
    }
}

/// Combine results: the worst status wins, ties go to the earliest result.
///
/// `ok_summary` replaces the summary line when every result is OK.
pub fn aggregate(results: Vec<CheckResult>, ok_summary: Option<String>) -> CheckOutcome {
    let Some(status) = results.iter().map(|r| r.status).max() else {
        return CheckOutcome::unknown("No queues matched");
    };

    let first = results.iter().find(|r| r.status == status);
    let summary = match (status, ok_summary) {
        (Status::Ok, Some(summary)) => summary,
        _ => first
            .map(|r| r.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Could not retrieve data".to_string()),
    };

    CheckOutcome {
        status,
        summary,
        results,
    }
}
