//! Alert gating and batch statistics
//!
//! Throttling decides whether an alert may go out; statistics summarise
//! what did go out in one processing pass.

mod stats;
mod throttle;

pub use stats::{AlertStatistics, StatisticsAggregator};
pub use throttle::{AlertThrottler, Clock, SystemClock, ThrottleEntry};
