//! Configuration file discovery and loading
//!
//! Files are TOML in the layout of [`Config`]. Every file is validated on
//! load, so a file that parses but carries a zero threshold or an empty
//! queue is rejected the same way as a syntax error.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Parse and validate the file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the first usable file from [`ConfigFile::default_paths`].
    ///
    /// Returns `None` when no candidate exists or every candidate is invalid;
    /// the caller then keeps the built-in defaults.
    pub fn load_default() -> Option<Config> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first existing, valid file among `candidates`.
    /// Broken files are logged and skipped.
    fn load_first(candidates: &[PathBuf]) -> Option<Config> {
        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load(path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    None
                }
            })
    }

    /// Candidate locations in search order: system-wide, the platform user
    /// config directory (`dirs::config_dir`), then the working directory.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/sentinel/config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("sentinel").join("config.toml"));
        }

        paths.push(PathBuf::from("sentinel.toml"));
        paths.push(PathBuf::from(".sentinel.toml"));
        paths
    }

    /// Where `config init` writes when no path is given: the user config
    /// directory, or `sentinel.toml` in the working directory on platforms
    /// without one.
    pub fn user_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("sentinel").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("sentinel.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_search_order() {
        let paths = ConfigFile::default_paths();
        assert_eq!(paths[0], PathBuf::from("/etc/sentinel/config.toml"));
        assert_eq!(paths.last(), Some(&PathBuf::from(".sentinel.toml")));
    }

    #[test]
    fn test_load_first_skips_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        let later = dir.path().join("later.toml");
        std::fs::write(&broken, "[thresholds]\ncpu = 0\n").unwrap();
        std::fs::write(&good, "[throttling]\nthrottle_minutes = 5\n").unwrap();
        std::fs::write(&later, "[throttling]\nthrottle_minutes = 60\n").unwrap();

        let candidates = vec![dir.path().join("absent.toml"), broken, good, later];
        let config = ConfigFile::load_first(&candidates).unwrap();
        assert_eq!(config.throttling.throttle_minutes, 5);
    }

    #[test]
    fn test_load_first_none_when_nothing_usable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigFile::load_first(&[dir.path().join("absent.toml")]).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        std::fs::write(
            &path,
            "[thresholds]\ncpu = 70\n\n[channels]\nlog_file = \"/tmp/x.log\"\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.thresholds.get("cpu").copied(), Some(70));
        // Replacing the table drops the other defaults
        assert_eq!(config.thresholds.get("memory").copied(), None);
        assert_eq!(config.channels.log_file, "/tmp/x.log");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        std::fs::write(&path, "[async_io]\nqueue_size = 0\n").unwrap();

        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        std::fs::write(&path, "[thresholds\ncpu = ").unwrap();

        assert!(matches!(ConfigFile::load(&path), Err(ConfigError::TomlError(_))));
    }
}
