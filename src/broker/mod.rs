//! Broker management API access.
//!
//! # Data Flow
//! ```text
//! ConnectionConfig
//!     → urls.rs (Jolokia request URLs per MBean)
//!     → client.rs (blocking-in-sequence HTTP GET, JSON decode)
//!     → types.rs (QueueSnapshot, started flag, lookup status)
//!     → check evaluators
//! ```
//!
//! # Design Decisions
//! - Evaluators depend on the `BrokerApi` trait, not on HTTP
//! - Every failure is a typed `FetchError`; nothing panics on bad input

pub mod client;
pub mod types;
pub mod urls;

pub use client::{BrokerApi, JolokiaClient};
pub use types::{FailureKind, FetchError, QueueSnapshot, RoutingType};
