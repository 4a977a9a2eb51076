//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::services::ProcessingResult;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Result of one snapshot for display
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    /// Position of the snapshot in the input
    pub index: usize,
    #[serde(flatten)]
    pub result: ProcessingResult,
}

impl TableDisplay for SnapshotReport {
    fn to_table(&self) -> String {
        let r = &self.result;
        let mut output = format!("Snapshot #{}\n", self.index);
        output.push_str(&format!("  Alerts sent: {}\n", r.alerts_sent));
        output.push_str(&format!("  Processed:   {}\n", r.processed_metrics.join(", ")));

        if let Some(stats) = &r.aggregation {
            let by_severity = stats
                .by_severity
                .iter()
                .map(|(severity, count)| format!("{}={}", severity.as_str(), count))
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("  By severity: {}\n", by_severity));
            if let Some(window) = &stats.time_window {
                output.push_str(&format!("  Window:      {}\n", window));
            }
        }

        if !r.errors.is_empty() {
            output.push_str("  Errors:\n");
            for error in &r.errors {
                output.push_str(&format!("    - {}\n", error));
            }
        }

        output
    }

    fn to_compact(&self) -> String {
        format!(
            "#{}: {} sent, {} processed, {} error(s)",
            self.index,
            self.result.alerts_sent,
            self.result.processed_metrics.len(),
            self.result.errors.len()
        )
    }
}

impl TableDisplay for Config {
    fn to_table(&self) -> String {
        self.to_toml().unwrap_or_default()
    }

    fn to_compact(&self) -> String {
        let thresholds = self
            .thresholds
            .iter()
            .map(|(metric, value)| format!("{}={}%", metric, value))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{} | throttle {} ({}m) | channels {} | log {}{}",
            thresholds,
            if self.throttling.enabled { "on" } else { "off" },
            self.throttling.throttle_minutes,
            self.channels.default_channels.join(","),
            self.channels.log_file,
            if self.async_io.enabled { " (async)" } else { "" }
        )
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
