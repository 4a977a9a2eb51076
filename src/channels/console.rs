//! Console channel

use super::AlertChannel;
use crate::domain::Alert;
use crate::error::ChannelError;
use std::io::{self, Write};

/// Prints alert messages to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

impl AlertChannel for ConsoleChannel {
    fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        // A closed stdout is not a delivery failure for this channel.
        if let Err(e) = writeln!(handle, "{}", alert.message) {
            log::debug!("Console write failed: {}", e);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
