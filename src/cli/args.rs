//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::domain::Severity;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Threshold-based system metric alerting
///
/// Evaluate metric snapshots against thresholds and deliver throttled alerts.
#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SENTINEL_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process metric snapshots and dispatch alerts
    Process(ProcessArgs),

    /// Inspect or create configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the process command
#[derive(Parser, Debug)]
pub struct ProcessArgs {
    /// JSON file holding one snapshot object or an array of them ("-" for stdin)
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub metrics: String,

    /// Channel to deliver to (repeatable; defaults to the configured set)
    #[arg(long = "channel", value_name = "NAME")]
    pub channels: Vec<String>,

    /// Deliver every alert, ignoring the throttle window
    #[arg(long)]
    pub no_throttle: bool,

    /// Force the severity for a metric (repeatable)
    #[arg(long = "severity", value_name = "METRIC=LEVEL", value_parser = parse_severity_override)]
    pub severities: Vec<(String, String)>,

    /// Throttle window in minutes
    #[arg(long)]
    pub throttle_minutes: Option<u64>,

    /// Log file for the "log" channel
    #[arg(long)]
    pub log_file: Option<String>,

    /// Write the log file synchronously instead of through the background writer
    #[arg(long)]
    pub sync_log: bool,

    /// Capacity of the background writer's queue
    #[arg(long, value_name = "N")]
    pub queue_size: Option<usize>,
}

/// Arguments for configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Validate the configuration and report the result
    Check,

    /// Write the default configuration to a file
    Init {
        /// Destination (defaults to the user config directory)
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Parse `METRIC=LEVEL`, checking the level names a known severity
fn parse_severity_override(s: &str) -> Result<(String, String), String> {
    let (metric, level) = s
        .split_once('=')
        .ok_or_else(|| format!("expected METRIC=LEVEL, got '{}'", s))?;

    if metric.is_empty() {
        return Err("metric name must not be empty".to_string());
    }
    level.parse::<Severity>().map_err(|e| {
        let levels: Vec<&str> = Severity::ALL.iter().map(Severity::as_str).collect();
        format!("{} (expected one of: {})", e, levels.join(", "))
    })?;

    Ok((metric.to_string(), level.to_string()))
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_process_defaults() {
        let args = Cli::try_parse_from(["sentinel", "process"]).unwrap();
        if let Commands::Process(process) = args.command {
            assert_eq!(process.metrics, "-");
            assert!(process.channels.is_empty());
            assert!(!process.no_throttle);
        } else {
            panic!("Expected Process command");
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["sentinel", "-v", "config", "show"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_process_args() {
        let args = Cli::try_parse_from([
            "sentinel",
            "process",
            "--metrics",
            "snap.json",
            "--channel",
            "console",
            "--channel",
            "log",
            "--no-throttle",
            "--severity",
            "cpu=critical",
            "--throttle-minutes",
            "5",
            "--queue-size",
            "64",
        ])
        .unwrap();

        if let Commands::Process(process) = args.command {
            assert_eq!(process.metrics, "snap.json");
            assert_eq!(process.channels, vec!["console", "log"]);
            assert!(process.no_throttle);
            assert_eq!(
                process.severities,
                vec![("cpu".to_string(), "critical".to_string())]
            );
            assert_eq!(process.throttle_minutes, Some(5));
            assert_eq!(process.queue_size, Some(64));
        } else {
            panic!("Expected Process command");
        }
    }

    #[test]
    fn test_cli_rejects_unknown_severity() {
        let err = Cli::try_parse_from(["sentinel", "process", "--severity", "cpu=urgent"]).unwrap_err();
        assert!(err.to_string().contains("expected one of: low, medium, high, critical"));

        let result = Cli::try_parse_from(["sentinel", "process", "--severity", "cpu"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_config_init() {
        let args = Cli::try_parse_from(["sentinel", "config", "init", "out.toml", "--force"]).unwrap();
        if let Commands::Config(config) = args.command {
            if let ConfigCommands::Init { path, force } = config.command {
                assert_eq!(path.as_deref(), Some("out.toml"));
                assert!(force);
            } else {
                panic!("Expected Init command");
            }
        } else {
            panic!("Expected Config command");
        }
    }
}
