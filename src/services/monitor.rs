//! Alert pipeline
//!
//! Runs one pass per snapshot: validate, evaluate each metric against its
//! threshold, throttle, format, dispatch, record, then aggregate.

use crate::alerts::{AlertStatistics, AlertThrottler, StatisticsAggregator};
use crate::channels::{AlertChannel, ChannelManager};
use crate::config::Config;
use crate::domain::{
    Alert, AlertFormatter, MetricSnapshot, MetricsValidator, Severity, SeverityCalculator,
};
use crate::error::{HandlerError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Outcome of one processing pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingResult {
    /// Alerts delivered (dispatched to channels) in this pass
    pub alerts_sent: usize,
    /// Validation and delivery errors, in the order they occurred
    pub errors: Vec<String>,
    /// Metrics with a configured threshold that were evaluated
    pub processed_metrics: Vec<String>,
    /// Statistics over the delivered alerts; `None` when nothing was sent
    pub aggregation: Option<AlertStatistics>,
}

/// The alerting pipeline entry point
///
/// `process` takes `&mut self`: the throttle state and channel registry
/// are owned by the monitor, so sharing one across threads requires an
/// outer lock.
pub struct SystemMonitor {
    thresholds: BTreeMap<String, u32>,
    calculator: SeverityCalculator,
    throttler: AlertThrottler,
    channels: ChannelManager,
}

impl SystemMonitor {
    /// Build a monitor with the default channels for `config`
    pub fn new(config: &Config) -> Result<Self> {
        let channels = ChannelManager::from_config(config)?;
        Ok(Self::with_channels(config, channels))
    }

    /// Build a monitor around an existing channel registry
    pub fn with_channels(config: &Config, channels: ChannelManager) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            calculator: SeverityCalculator::new(config.severity),
            throttler: AlertThrottler::new(config.throttling.throttle_minutes),
            channels,
        }
    }

    /// Replace the throttler (custom clock or window)
    pub fn with_throttler(mut self, throttler: AlertThrottler) -> Self {
        self.throttler = throttler;
        self
    }

    /// Register a channel, replacing any channel already under `name`
    pub fn register_channel(&mut self, name: impl Into<String>, channel: Box<dyn AlertChannel>) {
        self.channels.register_channel(name, channel);
    }

    /// Register a callback as a channel under `name`
    pub fn add_custom_channel<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&Alert) -> std::result::Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.channels.add_custom_channel(name, handler);
    }

    /// Channel registry
    pub fn channels(&self) -> &ChannelManager {
        &self.channels
    }

    /// Throttle state
    pub fn throttler(&self) -> &AlertThrottler {
        &self.throttler
    }

    /// Process one snapshot and dispatch alerts to `channel_names`.
    ///
    /// Validation problems and delivery failures are reported inside the
    /// result. The only `Err` is an unknown severity override, which is
    /// detected before any metric is evaluated.
    pub fn process<S: AsRef<str>>(
        &mut self,
        snapshot: &MetricSnapshot,
        channel_names: &[S],
        throttling_enabled: bool,
        severity_overrides: Option<&HashMap<String, String>>,
    ) -> Result<ProcessingResult> {
        let mut result = ProcessingResult::default();

        let validation_errors = MetricsValidator::validate(snapshot);
        if !validation_errors.is_empty() {
            log::warn!("Rejected snapshot: {}", validation_errors.join(", "));
            result.errors = validation_errors;
            return Ok(result);
        }

        if let Some(overrides) = severity_overrides {
            for level in overrides.values().filter(|s| !s.is_empty()) {
                level.parse::<Severity>()?;
            }
        }

        // Presence checked by the validator
        let timestamp = snapshot.timestamp().unwrap_or_default();
        let mut batch = Vec::new();

        for (metric, value) in snapshot.metrics() {
            let reading = value.as_f64();
            let Some(threshold) = self.thresholds.get(metric).copied() else {
                log::debug!("No threshold for '{}', skipping", metric);
                continue;
            };
            let threshold = f64::from(threshold);

            if reading <= threshold {
                result.processed_metrics.push(metric.to_string());
                continue;
            }

            let override_level = severity_overrides
                .and_then(|o| o.get(metric))
                .map(String::as_str);
            let severity = self.calculator.calculate(reading, threshold, override_level)?;

            if throttling_enabled && !self.throttler.should_send(metric) {
                log::debug!("Throttled {} alert for '{}' ({})", severity, metric, value);
                result.processed_metrics.push(metric.to_string());
                continue;
            }

            let alert = AlertFormatter::create_alert(metric, value, threshold, severity, timestamp);
            let channel_errors = self.channels.send_alert(&alert, channel_names);
            result.errors.extend(channel_errors);

            self.throttler.record(metric, severity, reading);

            batch.push(alert);
            result.alerts_sent += 1;
            result.processed_metrics.push(metric.to_string());
        }

        if !batch.is_empty() {
            result.aggregation = Some(StatisticsAggregator::aggregate(
                &batch,
                self.throttler.throttle_minutes(),
            ));
        }

        Ok(result)
    }

    /// Shut down every channel, draining background writers
    pub fn shutdown(&self) {
        self.channels.shutdown();
    }
}
