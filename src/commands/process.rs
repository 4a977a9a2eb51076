//! Process command implementation
//!
//! Feeds metric snapshots through one monitor and prints each result.

use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::cli::output::{print_output, SnapshotReport};
use crate::config::{Config, ConfigBuilder};
use crate::domain::MetricSnapshot;
use crate::error::{AppError, Result};
use crate::services::SystemMonitor;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// A single snapshot object or an array of them
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotInput {
    One(MetricSnapshot),
    Many(Vec<MetricSnapshot>),
}

/// Execute the process command
pub fn run_process(
    args: &ProcessArgs,
    format: OutputFormat,
    config_path: Option<&str>,
) -> Result<()> {
    let config = build_config(args, config_path)?;
    let snapshots = parse_snapshots(&read_input(&args.metrics)?)?;

    let channels: Vec<String> = if args.channels.is_empty() {
        config.channels.default_channels.clone()
    } else {
        args.channels.clone()
    };
    let throttling = config.throttling.enabled;
    let overrides: HashMap<String, String> = args.severities.iter().cloned().collect();
    let overrides = (!overrides.is_empty()).then_some(&overrides);

    let mut monitor = SystemMonitor::new(&config)?;
    for name in channels.iter().filter(|name| !monitor.channels().contains(name)) {
        log::warn!("Channel '{}' is not registered, deliveries to it will fail", name);
    }
    log::debug!(
        "Processing {} snapshot(s) to [{}], throttling {}",
        snapshots.len(),
        channels.join(", "),
        if throttling { "on" } else { "off" }
    );

    let outcome = process_all(&mut monitor, &snapshots, &channels, throttling, overrides, format);
    monitor.shutdown();
    outcome
}

fn process_all(
    monitor: &mut SystemMonitor,
    snapshots: &[MetricSnapshot],
    channels: &[String],
    throttling: bool,
    overrides: Option<&HashMap<String, String>>,
    format: OutputFormat,
) -> Result<()> {
    for (index, snapshot) in snapshots.iter().enumerate() {
        let result = monitor.process(snapshot, channels, throttling, overrides)?;
        print_output(&SnapshotReport { index, result }, format)?;
    }
    Ok(())
}

fn build_config(args: &ProcessArgs, config_path: Option<&str>) -> Result<Config> {
    let config = ConfigBuilder::new()
        .with_file(config_path)?
        .with_throttle_minutes(args.throttle_minutes)
        .with_throttling(args.no_throttle.then_some(false))
        .with_log_file(args.log_file.clone())
        .with_async_io(args.sync_log.then_some(false))
        .with_queue_size(args.queue_size)
        .build()?;
    Ok(config)
}

fn read_input(source: &str) -> Result<String> {
    let mut input = String::new();
    if source == "-" {
        std::io::stdin().read_to_string(&mut input)?;
    } else {
        input = std::fs::read_to_string(source)?;
    }
    Ok(input)
}

/// Decode one snapshot object or an array of snapshots
fn parse_snapshots(input: &str) -> Result<Vec<MetricSnapshot>> {
    let parsed: SnapshotInput = serde_json::from_str(input).map_err(|_| {
        AppError::InvalidInput("expected a snapshot object or an array of them".to_string())
    })?;

    Ok(match parsed {
        SnapshotInput::One(snapshot) => vec![snapshot],
        SnapshotInput::Many(snapshots) => snapshots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SNAPSHOT: &str =
        r#"{"cpu": 95, "memory": 90, "disk": 10, "network": 10, "timestamp": 1700000000}"#;

    fn args(metrics: &str) -> ProcessArgs {
        ProcessArgs {
            metrics: metrics.to_string(),
            channels: vec!["log".to_string()],
            no_throttle: false,
            severities: Vec::new(),
            throttle_minutes: None,
            log_file: None,
            sync_log: true,
            queue_size: None,
        }
    }

    #[test]
    fn test_parse_single_snapshot() {
        let snapshots = parse_snapshots(SNAPSHOT).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].get("cpu"), Some(95.0));
    }

    #[test]
    fn test_parse_snapshot_array() {
        let input = format!("[{}, {}]", SNAPSHOT, SNAPSHOT);
        assert_eq!(parse_snapshots(&input).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let result = parse_snapshots(r#"{"cpu": "high"}"#);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[throttling]\nthrottle_minutes = 30\n").unwrap();

        let mut process_args = args("-");
        process_args.log_file = Some("other.log".to_string());
        let config = build_config(&process_args, config_path.to_str()).unwrap();

        assert_eq!(config.throttling.throttle_minutes, 30);
        assert!(config.throttling.enabled);
        assert_eq!(config.channels.log_file, "other.log");
        assert!(!config.async_io.enabled);
    }

    #[test]
    fn test_build_config_applies_throttle_and_queue_flags() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[async_io]\nqueue_size = 10\n").unwrap();

        let mut process_args = args("-");
        process_args.no_throttle = true;
        process_args.queue_size = Some(64);
        let config = build_config(&process_args, config_path.to_str()).unwrap();

        assert!(!config.throttling.enabled);
        assert_eq!(config.async_io.queue_size, 64);

        process_args.queue_size = Some(0);
        assert!(matches!(
            build_config(&process_args, config_path.to_str()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_run_process_no_throttle_repeats_alerts() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("alerts.log");
        let metrics_path = dir.path().join("metrics.json");
        std::fs::write(&metrics_path, format!("[{}, {}]", SNAPSHOT, SNAPSHOT)).unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let mut process_args = args(metrics_path.to_str().unwrap());
        process_args.log_file = Some(log_path.to_str().unwrap().to_string());
        process_args.no_throttle = true;

        run_process(&process_args, OutputFormat::Compact, config_path.to_str()).unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(contents.lines().count(), 4);
    }

    #[test]
    fn test_run_process_throttles_across_snapshots() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("alerts.log");
        let metrics_path = dir.path().join("metrics.json");
        std::fs::write(&metrics_path, format!("[{}, {}]", SNAPSHOT, SNAPSHOT)).unwrap();

        let mut process_args = args(metrics_path.to_str().unwrap());
        process_args.log_file = Some(log_path.to_str().unwrap().to_string());

        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        run_process(&process_args, OutputFormat::Compact, config_path.to_str()).unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[MEDIUM] CPU alert: 95%"));
        assert!(lines[1].starts_with("[MEDIUM] MEMORY alert: 90%"));
    }

    #[test]
    fn test_run_process_severity_override() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("alerts.log");
        let metrics_path = dir.path().join("metrics.json");
        std::fs::write(&metrics_path, SNAPSHOT).unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let mut process_args = args(metrics_path.to_str().unwrap());
        process_args.log_file = Some(log_path.to_str().unwrap().to_string());
        process_args.severities = vec![("cpu".to_string(), "critical".to_string())];

        run_process(&process_args, OutputFormat::Json, config_path.to_str()).unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("[CRITICAL] CPU alert"));
        assert!(contents.contains("[MEDIUM] MEMORY alert"));
    }
}
