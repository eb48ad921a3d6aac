//! Classification, statistics, and service wiring for the basura waste-level dashboard.

/// Threshold table and collection policy.
pub mod classifier;
/// Errors raised by the pure core routines.
pub mod error;
/// Domain models shared by all sources.
pub mod model;
/// Registry and helpers for plugging data sources into the service.
pub mod plugin;
/// Traits describing the source and predictor interfaces.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// Aggregation and ranking over classified districts.
pub mod stats;

pub use classifier::*;
pub use error::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
pub use stats::*;
