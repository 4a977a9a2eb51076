//! Alert records and message formatting

use super::severity::Severity;
use super::value::MetricValue;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Layout of the time portion of an alert message
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A delivered alert. Built once per qualifying metric, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Human-readable message, also the log line
    pub message: String,
    /// Alert severity
    pub severity: Severity,
    /// Metric name the alert is about
    pub metric_type: String,
    /// Observed value, as it was read
    pub value: MetricValue,
    /// Configured threshold
    pub threshold: f64,
    /// Sample time, seconds since the Unix epoch
    pub timestamp: f64,
}

/// Builds alert messages and records
pub struct AlertFormatter;

impl AlertFormatter {
    /// Render the alert message.
    ///
    /// Layout: `[<SEVERITY>] <METRIC> alert: <value>% (threshold: <threshold>%) at <local time>`
    pub fn format_message(
        metric_type: &str,
        value: impl Into<MetricValue>,
        threshold: f64,
        severity: Severity,
        timestamp: f64,
    ) -> String {
        let value = value.into();
        format!(
            "[{}] {} alert: {}% (threshold: {}%) at {}",
            severity,
            metric_type.to_uppercase(),
            value,
            threshold,
            Self::format_time(timestamp)
        )
    }

    /// Render an epoch timestamp in local time
    pub fn format_time(timestamp: f64) -> String {
        local_time(timestamp)
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| "????-??-?? ??:??:??".to_string())
    }

    /// Build the immutable alert record
    pub fn create_alert(
        metric_type: &str,
        value: impl Into<MetricValue>,
        threshold: f64,
        severity: Severity,
        timestamp: f64,
    ) -> Alert {
        let value = value.into();
        Alert {
            message: Self::format_message(metric_type, value, threshold, severity, timestamp),
            severity,
            metric_type: metric_type.to_string(),
            value,
            threshold,
            timestamp,
        }
    }
}

fn local_time(timestamp: f64) -> Option<DateTime<Local>> {
    if !timestamp.is_finite() {
        return None;
    }

    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9).min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos).map(|utc| utc.with_timezone(&Local))
}
