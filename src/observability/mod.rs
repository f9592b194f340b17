//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (queue, delta, status)
//!     → logging.rs subscriber → stderr
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for the monitoring result line
//! - Quiet by default (warn); raise with -v or RUST_LOG

pub mod logging;

pub use logging::init_logging;
