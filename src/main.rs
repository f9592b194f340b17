//! `check_artemis`: monitoring plugin for ActiveMQ Artemis.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ cli ──▶ config ──▶ CheckKind
//!                                  │
//!                                  ▼
//!                          ┌──────────────┐      ┌──────────────┐
//!                          │ check runner │─────▶│ broker client│──▶ Jolokia (HTTP/JSON)
//!                          │  evaluators  │      └──────────────┘
//!                          │  aggregator  │─────▶ DLQ cache file
//!                          └──────┬───────┘
//!                                 ▼
//!                  output: "LABEL STATUS - summary | perfdata", exit 0..3
//! ```
//!
//! Requests are issued strictly one after another on a single thread.

use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;

use check_artemis::broker::JolokiaClient;
use check_artemis::check::{run_with_timeout, CheckOutcome, Status, Thresholds};
use check_artemis::cli::Cli;
use check_artemis::observability::init_logging;
use check_artemis::output::print_and_exit;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(Status::Unknown.exit_code());
        }
    };

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, "warn");
            tracing::error!(error = %e, "Invalid configuration");
            print_and_exit(
                "ARTEMIS",
                &CheckOutcome::unknown(format!("Invalid configuration: {}", e)),
            );
        }
    };
    init_logging(cli.verbose, &config.observability.log_level);

    let kind = cli.check_kind(&config);
    let label = kind.label();
    if let Some(t) = kind.thresholds().filter(Thresholds::is_inverted) {
        tracing::warn!(
            warn = t.warn,
            crit = t.crit,
            "Warning threshold exceeds critical threshold; critical takes precedence"
        );
    }

    tracing::info!(
        check = label,
        broker = %config.connection.broker_name,
        timeout_secs = config.connection.timeout_secs,
        "check_artemis v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let client = match JolokiaClient::new(&config.connection) {
        Ok(client) => client,
        Err(e) => print_and_exit(
            label,
            &CheckOutcome::unknown(format!("Cannot create HTTP client: {}", e)),
        ),
    };

    let deadline = kind.deadline(Duration::from_secs(config.connection.timeout_secs));
    let outcome = run_with_timeout(&kind, &client, deadline).await;
    print_and_exit(label, &outcome);
}
