//! Domain models for sentinel
//!
//! Snapshots, severities and alert records. Everything here is pure:
//! no I/O, no shared state.

pub mod alert;
pub mod severity;
pub mod snapshot;
pub mod value;

pub use alert::{Alert, AlertFormatter};
pub use severity::{Severity, SeverityCalculator, SeverityRatios};
pub use snapshot::{MetricSnapshot, MetricsValidator, TIMESTAMP_KEY};
pub use value::MetricValue;
