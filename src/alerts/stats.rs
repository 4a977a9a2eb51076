//! Per-batch alert statistics

use crate::domain::{Alert, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of the alerts delivered in one processing pass
///
/// The default value is the empty summary, distinct from a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertStatistics {
    /// Number of alerts in the batch
    pub total_alerts: usize,
    /// Occurrences per severity level
    pub by_severity: BTreeMap<Severity, usize>,
    /// Display label of the throttle window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,
}

impl AlertStatistics {
    /// True for the summary of an empty batch
    pub fn is_empty(&self) -> bool {
        self.total_alerts == 0
    }

    /// Occurrences of one severity level
    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}

/// Tallies a batch of alerts
pub struct StatisticsAggregator;

impl StatisticsAggregator {
    /// Aggregate a batch; order of `alerts` does not matter
    pub fn aggregate(alerts: &[Alert], throttle_minutes: u64) -> AlertStatistics {
        if alerts.is_empty() {
            return AlertStatistics::default();
        }

        let mut by_severity = BTreeMap::new();
        for alert in alerts {
            *by_severity.entry(alert.severity).or_insert(0) += 1;
        }

        AlertStatistics {
            total_alerts: alerts.len(),
            by_severity,
            time_window: Some(format!("{} minutes", throttle_minutes)),
        }
    }
}
