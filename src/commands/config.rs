//! Config command implementation
//!
//! Shows, checks and initialises the TOML configuration.

use crate::cli::args::{ConfigArgs, ConfigCommands, OutputFormat};
use crate::cli::output::{print_output, Message};
use crate::config::{Config, ConfigBuilder, ConfigFile};
use crate::error::Result;
use std::io;
use std::path::{Path, PathBuf};

/// Execute config commands
pub fn run_config(args: &ConfigArgs, format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => {
            let config = ConfigBuilder::new().with_file(config_path)?.build()?;
            print_output(&config, format)?;
            Ok(())
        }
        ConfigCommands::Check => {
            ConfigBuilder::new().with_file(config_path)?.build()?;
            let source = config_path.unwrap_or("default search path");
            print_output(
                &Message {
                    message: format!("Configuration is valid ({})", source),
                    success: true,
                },
                format,
            )?;
            Ok(())
        }
        ConfigCommands::Init { path, force } => {
            let target = path.as_ref().map(PathBuf::from).unwrap_or_else(ConfigFile::user_path);
            init_config(&target, *force)?;
            print_output(
                &Message {
                    message: format!("Wrote default configuration to {}", target.display()),
                    success: true,
                },
                format,
            )?;
            Ok(())
        }
    }
}

fn init_config(target: &Path, force: bool) -> Result<()> {
    if target.exists() && !force {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to overwrite)", target.display()),
        )
        .into());
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    log::info!("Writing default configuration to {}", target.display());
    Config::default().save(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("config.toml");

        init_config(&target, false).unwrap();

        let config = ConfigFile::load(&target).unwrap();
        assert_eq!(config.thresholds.get("cpu").copied(), Some(80));
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("config.toml");
        std::fs::write(&target, "# keep me\n").unwrap();

        let result = init_config(&target, false);
        assert!(matches!(result, Err(AppError::Io(e)) if e.kind() == io::ErrorKind::AlreadyExists));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# keep me\n");

        init_config(&target, true).unwrap();
        assert!(std::fs::read_to_string(&target).unwrap().contains("[thresholds]"));
    }

    #[test]
    fn test_check_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("config.toml");
        std::fs::write(&target, "[thresholds]\ncpu = 0\n").unwrap();

        let args = ConfigArgs {
            command: ConfigCommands::Check,
        };
        let result = run_config(&args, OutputFormat::Compact, target.to_str());
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
