//! Alert delivery channels
//!
//! Every channel implements [`AlertChannel`]. The [`ChannelManager`] keeps
//! them in a name-indexed registry and fans each alert out to the requested
//! names, collecting failures instead of stopping at the first one.

mod async_log;
mod console;
mod custom;
mod log_file;

pub use async_log::{AsyncLogFileChannel, AsyncLogOptions};
pub use console::ConsoleChannel;
pub use custom::CustomHandlerChannel;
pub use log_file::LogFileChannel;

use crate::config::Config;
use crate::domain::Alert;
use crate::error::{ChannelError, HandlerError};
use std::collections::HashMap;
use std::time::Duration;

/// Name of the built-in console channel
pub const CONSOLE_CHANNEL: &str = "console";
/// Name of the built-in log file channel
pub const LOG_CHANNEL: &str = "log";

/// Delivery target for alerts
pub trait AlertChannel: Send + Sync {
    /// Deliver one alert. Failures come back as values, never as panics.
    fn send(&self, alert: &Alert) -> Result<(), ChannelError>;

    /// Channel kind for identification
    fn name(&self) -> &str;

    /// Release background resources. Called once on monitor shutdown.
    fn shutdown(&self) {}
}

/// Name-indexed registry of channels
pub struct ChannelManager {
    channels: HashMap<String, Box<dyn AlertChannel>>,
}

impl ChannelManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Build the default registry: `console`, plus `log` backed by either the
    /// background writer or the synchronous writer depending on config.
    pub fn from_config(config: &Config) -> Result<Self, ChannelError> {
        let mut manager = Self::new();
        manager.register_channel(CONSOLE_CHANNEL, Box::new(ConsoleChannel::new()));

        let log_file = &config.channels.log_file;
        let log_channel: Box<dyn AlertChannel> = if config.async_io.enabled {
            let options = AsyncLogOptions {
                capacity: config.async_io.queue_size,
                poll_interval: Duration::from_millis(config.async_io.poll_interval_ms),
                shutdown_timeout: Duration::from_millis(config.async_io.shutdown_timeout_ms),
                start_paused: false,
            };
            Box::new(AsyncLogFileChannel::with_options(log_file, options)?)
        } else {
            Box::new(LogFileChannel::new(log_file))
        };
        manager.register_channel(LOG_CHANNEL, log_channel);

        Ok(manager)
    }

    /// Register a channel, replacing any channel already under `name`
    pub fn register_channel(&mut self, name: impl Into<String>, channel: Box<dyn AlertChannel>) {
        let name = name.into();
        log::info!("Registered {} channel as '{}'", channel.name(), name);
        if let Some(previous) = self.channels.insert(name, channel) {
            previous.shutdown();
        }
    }

    /// Register a callback as a channel under `name`
    pub fn add_custom_channel<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&Alert) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.register_channel(name, Box::new(CustomHandlerChannel::new(name, handler)));
    }

    /// Send `alert` to each named channel.
    ///
    /// Every name is attempted; the returned list holds one message per
    /// failed or unknown channel, in request order.
    pub fn send_alert<S: AsRef<str>>(&self, alert: &Alert, channel_names: &[S]) -> Vec<String> {
        let mut errors = Vec::new();

        for name in channel_names {
            let name = name.as_ref();
            let result = match self.channels.get(name) {
                Some(channel) => channel.send(alert),
                None => Err(ChannelError::UnknownChannel(name.to_string())),
            };

            if let Err(e) = result {
                log::warn!("Delivery via '{}' failed: {}", name, e);
                errors.push(e.to_string());
            }
        }

        errors
    }

    /// Check whether a channel is registered
    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Registered channel names, sorted
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Shut down every registered channel
    pub fn shutdown(&self) {
        for channel in self.channels.values() {
            channel.shutdown();
        }
    }
}

impl Default for ChannelManager {
    fn default() -> Self {
        Self::new()
    }
}
