//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file.
    ///
    /// An explicit path must load; without one the default locations are
    /// searched and defaults are kept if none is usable.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => self.config = ConfigFile::load(path)?,
            None => {
                if let Some(cfg) = ConfigFile::load_default() {
                    self.config = cfg;
                }
            }
        }
        Ok(self)
    }

    /// Override the throttle window
    pub fn with_throttle_minutes(mut self, minutes: Option<u64>) -> Self {
        if let Some(m) = minutes {
            self.config.throttling.throttle_minutes = m;
        }
        self
    }

    /// Override whether throttling is applied
    pub fn with_throttling(mut self, enabled: Option<bool>) -> Self {
        if let Some(e) = enabled {
            self.config.throttling.enabled = e;
        }
        self
    }

    /// Override the log file path
    pub fn with_log_file(mut self, path: Option<String>) -> Self {
        if let Some(p) = path {
            self.config.channels.log_file = p;
        }
        self
    }

    /// Override the background writer switch
    pub fn with_async_io(mut self, enabled: Option<bool>) -> Self {
        if let Some(e) = enabled {
            self.config.async_io.enabled = e;
        }
        self
    }

    /// Override the queue capacity
    pub fn with_queue_size(mut self, size: Option<usize>) -> Self {
        if let Some(s) = size {
            self.config.async_io.queue_size = s;
        }
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
