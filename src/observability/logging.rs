//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Map `-v` counts and the configured level to a filter
//!
//! # Design Decisions
//! - Logs go to stderr; stdout carries only the plugin result
//! - `RUST_LOG` overrides both the flag and the config file

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the given verbosity, falling back to `configured`.
pub fn filter_directive(verbosity: u8, configured: &str) -> String {
    let level = match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("check_artemis={}", level)
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(verbosity: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter_directive(verbosity, configured).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_config() {
        assert_eq!(filter_directive(0, "warn"), "check_artemis=warn");
        assert_eq!(filter_directive(1, "warn"), "check_artemis=info");
        assert_eq!(filter_directive(2, "error"), "check_artemis=debug");
        assert_eq!(filter_directive(7, "warn"), "check_artemis=trace");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(0, "warn");
        init_logging(3, "warn");
    }
}
