//! sentinel - threshold-based system metric alerting
//!
//! Reads metric snapshots, raises alerts for values over their thresholds,
//! and delivers them to the console, a log file, or custom channels.

use clap::Parser;
use sentinel::cli::args::{generate_completions, Cli, Commands};
use sentinel::commands::{run_config, run_process};
use sentinel::domain::Severity;
use sentinel::error::{AppError, ConfigError, SeverityError};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Process(args) => run_process(args, cli.format, config_path),

        Commands::Config(args) => run_config(args, cli.format, config_path),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Create one with 'sentinel config init <PATH>'.");
        }
        AppError::Config(ConfigError::TomlError(_)) => {
            eprintln!();
            eprintln!("Hint: Compare against the output of 'sentinel config show'.");
        }
        AppError::Severity(SeverityError::Unknown(_)) => {
            eprintln!();
            let levels: Vec<&str> = Severity::ALL.iter().map(Severity::as_str).collect();
            eprintln!("Hint: Valid levels are {}.", levels.join(", "));
        }
        AppError::InvalidInput(_) => {
            eprintln!();
            eprintln!("Hint: Input must be JSON such as {{\"cpu\": 91.5, \"memory\": 40, \"disk\": 70, \"network\": 12, \"timestamp\": 1700000000}}.");
        }
        _ => {}
    }
}
