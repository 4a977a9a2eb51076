//! Per-metric alert throttling
//!
//! Keeps the last delivered alert for each metric type and suppresses new
//! ones until the throttle window has elapsed.

use crate::domain::Severity;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> SystemTime;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Last delivered alert for one metric type
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleEntry {
    /// When the alert was recorded
    pub last_timestamp: SystemTime,
    /// Severity of that alert
    pub last_severity: Severity,
    /// Value that triggered it
    pub last_value: f64,
}

/// Stateful gate allowing at most one alert per metric per window
pub struct AlertThrottler {
    throttle_minutes: u64,
    window: Duration,
    last_alerts: HashMap<String, ThrottleEntry>,
    clock: Arc<dyn Clock>,
}

impl AlertThrottler {
    /// Create a throttler using the system clock
    pub fn new(throttle_minutes: u64) -> Self {
        Self::with_clock(throttle_minutes, Arc::new(SystemClock))
    }

    /// Create a throttler with an explicit time source
    pub fn with_clock(throttle_minutes: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            throttle_minutes,
            window: Duration::from_secs(throttle_minutes.saturating_mul(60)),
            last_alerts: HashMap::new(),
            clock,
        }
    }

    /// Window length in minutes
    pub fn throttle_minutes(&self) -> u64 {
        self.throttle_minutes
    }

    /// Whether an alert for `metric_type` may be sent now.
    ///
    /// True when nothing was recorded for the metric, or when at least the
    /// full window has elapsed since the last recorded alert.
    pub fn should_send(&self, metric_type: &str) -> bool {
        let Some(entry) = self.last_alerts.get(metric_type) else {
            return true;
        };

        // A clock that went backwards counts as no time elapsed.
        let elapsed = self
            .clock
            .now()
            .duration_since(entry.last_timestamp)
            .unwrap_or(Duration::ZERO);

        elapsed >= self.window
    }

    /// Record a delivered alert, replacing any previous entry for the metric
    pub fn record(&mut self, metric_type: &str, severity: Severity, value: f64) {
        let entry = ThrottleEntry {
            last_timestamp: self.clock.now(),
            last_severity: severity,
            last_value: value,
        };
        self.last_alerts.insert(metric_type.to_string(), entry);
    }

    /// Last recorded alert for a metric
    pub fn last_alert(&self, metric_type: &str) -> Option<&ThrottleEntry> {
        self.last_alerts.get(metric_type)
    }

    /// Number of metric types with a recorded alert
    pub fn tracked_metrics(&self) -> usize {
        self.last_alerts.len()
    }
}
