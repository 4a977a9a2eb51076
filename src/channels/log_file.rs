//! Synchronous log file channel

use super::AlertChannel;
use crate::domain::Alert;
use crate::error::ChannelError;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default log file used when none is configured
pub const DEFAULT_LOG_FILE: &str = "alerts.log";

/// Appends each alert message to a file, opening and closing it per alert
#[derive(Debug, Clone)]
pub struct LogFileChannel {
    path: PathBuf,
}

impl LogFileChannel {
    /// Create a channel writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for LogFileChannel {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}

impl AlertChannel for LogFileChannel {
    fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        append_line(&self.path, &alert.message).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidInput => ChannelError::InvalidLogPath(e.to_string()),
            _ => ChannelError::LogWrite(e),
        })
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Append `line` plus a newline to `path`, creating the file if needed.
///
/// The line and its terminator go out in a single write so concurrent
/// appenders never interleave within a line.
pub(crate) fn append_line(path: &Path, line: &str) -> io::Result<()> {
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty path"));
    }

    let mut record = String::with_capacity(line.len() + 1);
    record.push_str(line);
    record.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(record.as_bytes())
}
