//! Monitoring plugin library for ActiveMQ Artemis brokers.
//!
//! Reads broker state through the Jolokia management API, classifies it
//! against thresholds and renders a monitoring-plugin result.

pub mod broker;
pub mod cache;
pub mod check;
pub mod cli;
pub mod config;
pub mod observability;
pub mod output;

pub use broker::{BrokerApi, JolokiaClient};
pub use check::{CheckKind, CheckOutcome, Status};
pub use config::ProbeConfig;
