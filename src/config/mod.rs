//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (cli.rs)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable for the probe pass)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the probe runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::ConnectionConfig;
pub use schema::DlqConfig;
pub use schema::ProbeConfig;
pub use schema::ThresholdConfig;
