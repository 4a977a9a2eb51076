//! Service layer
//!
//! The monitor sequences the domain, alert and channel components into the
//! processing pipeline.

pub mod monitor;

pub use monitor::{ProcessingResult, SystemMonitor};
