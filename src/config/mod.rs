//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging. The resulting
//! [`Config`] is built once at startup and handed to the components by
//! reference.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::domain::SeverityRatios;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Alert threshold per metric, in percent
    pub thresholds: BTreeMap<String, u32>,
    /// Severity ratio cut points
    pub severity: SeverityRatios,
    /// Throttling settings
    pub throttling: ThrottlingConfig,
    /// Channel settings
    pub channels: ChannelsConfig,
    /// Background log writer settings
    pub async_io: AsyncIoConfig,
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = [("cpu", 80), ("memory", 85), ("disk", 90), ("network", 75)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            thresholds,
            severity: SeverityRatios::default(),
            throttling: ThrottlingConfig::default(),
            channels: ChannelsConfig::default(),
            async_io: AsyncIoConfig::default(),
        }
    }
}

impl Config {
    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((metric, _)) = self.thresholds.iter().find(|(_, v)| **v == 0) {
            return Err(ConfigError::InvalidValue {
                key: format!("thresholds.{}", metric),
                message: "threshold must be greater than zero".to_string(),
            });
        }

        let r = &self.severity;
        if !(r.critical_ratio >= r.high_ratio && r.high_ratio >= r.medium_ratio) {
            return Err(ConfigError::InvalidValue {
                key: "severity".to_string(),
                message: format!(
                    "ratios must be descending (critical {} >= high {} >= medium {})",
                    r.critical_ratio, r.high_ratio, r.medium_ratio
                ),
            });
        }

        if self.async_io.queue_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "async_io.queue_size".to_string(),
                message: "queue size must be at least 1".to_string(),
            });
        }

        if self.async_io.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "async_io.poll_interval_ms".to_string(),
                message: "poll interval must be at least 1ms".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let contents = self.to_toml()?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize: {}", e)))
    }
}

/// Throttling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottlingConfig {
    /// Throttle repeated alerts by default
    pub enabled: bool,
    /// Minimum minutes between alerts for one metric
    pub throttle_minutes: u64,
}

impl Default for ThrottlingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            throttle_minutes: 15,
        }
    }
}

/// Channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Log file used by the `log` channel
    pub log_file: String,
    /// Channels used when none are requested explicitly
    pub default_channels: Vec<String>,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            log_file: "alerts.log".to_string(),
            default_channels: vec!["console".to_string(), "log".to_string()],
        }
    }
}

/// Background log writer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncIoConfig {
    /// Use the background writer for the `log` channel
    pub enabled: bool,
    /// Queue capacity
    pub queue_size: usize,
    /// Idle wait between stop-flag checks
    pub poll_interval_ms: u64,
    /// Upper bound on joining the writer at shutdown
    pub shutdown_timeout_ms: u64,
}

impl Default for AsyncIoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_size: 1000,
            poll_interval_ms: 500,
            shutdown_timeout_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.thresholds.get("cpu").copied(), Some(80));
        assert_eq!(config.thresholds.get("network").copied(), Some(75));
        assert_eq!(config.thresholds.get("gpu").copied(), None);
        assert_eq!(config.throttling.throttle_minutes, 15);
        assert_eq!(config.async_io.queue_size, 1000);
        assert_eq!(config.channels.log_file, "alerts.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [throttling]
            throttle_minutes = 5

            [severity]
            critical_ratio = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.throttling.throttle_minutes, 5);
        assert!(config.throttling.enabled);
        assert_eq!(config.severity.critical_ratio, 2.0);
        assert_eq!(config.severity.high_ratio, 1.2);
        assert_eq!(config.thresholds.get("disk").copied(), Some(90));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = Config::default();
        config.thresholds.insert("cpu".to_string(), 0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("thresholds.cpu"));
    }

    #[test]
    fn test_unordered_ratios_rejected() {
        let mut config = Config::default();
        config.severity.high_ratio = 1.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_queue_rejected() {
        let mut config = Config::default();
        config.async_io.queue_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.thresholds, config.thresholds);
        assert_eq!(parsed.channels.default_channels, config.channels.default_channels);
    }
}
