//! Plugin output rendering.
//!
//! # Format
//! ```text
//! LABEL STATUS - summary | 'perf'=value;warn;crit;min ...
//! further non-OK result messages, one per line
//! ```
//!
//! # Design Decisions
//! - Exit code maps 1:1 from the overall status (0/1/2/3)
//! - Sentinel metrics never appear in performance data
//! - Only age, size and DLQ metrics carry performance data

use crate::check::{CheckOutcome, CheckResult, Status};

/// Render one performance data entry, if the result carries one.
fn perfdata_entry(result: &CheckResult) -> Option<String> {
    let metric = &result.metric;
    if metric.is_failed() || !metric.context.has_perfdata() {
        return None;
    }

    let label = metric.name.replace('\'', "\"");
    let (warn, crit) = result
        .thresholds
        .map(|t| (t.warn.to_string(), t.crit.to_string()))
        .unwrap_or_default();
    let min = metric.min.map(|m| m.to_string()).unwrap_or_default();

    let entry = format!("'{}'={};{};{};{}", label, metric.numeric(), warn, crit, min);
    Some(entry.trim_end_matches(';').to_string())
}

/// Performance data of all results, space separated.
pub fn perfdata(results: &[CheckResult]) -> String {
    results
        .iter()
        .filter_map(perfdata_entry)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the complete plugin output.
pub fn render(label: &str, outcome: &CheckOutcome) -> String {
    let mut out = format!("{} {} - {}", label, outcome.status, outcome.summary);

    let perf = perfdata(&outcome.results);
    if !perf.is_empty() {
        out.push_str(" | ");
        out.push_str(&perf);
    }

    // Long output: every other problem, in evaluation order.
    let first = outcome.first_significant();
    for result in &outcome.results {
        if result.status == Status::Ok || first.is_some_and(|f| std::ptr::eq(f, result)) {
            continue;
        }
        out.push('\n');
        out.push_str(&format!("{}: {}", result.status, result.message));
    }
    out
}

/// Print the outcome and terminate with its exit code.
pub fn print_and_exit(label: &str, outcome: &CheckOutcome) -> ! {
    println!("{}", render(label, outcome));
    std::process::exit(outcome.status.exit_code())
}
