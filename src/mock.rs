//! Mock implementations for testing
//!
//! Provides a controllable clock and a recording channel so pipeline tests
//! run without real time passing or real output.

use crate::alerts::Clock;
use crate::channels::AlertChannel;
use crate::domain::Alert;
use crate::error::ChannelError;

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    /// Start at a fixed, arbitrary instant
    pub fn new() -> Self {
        Self {
            now: Mutex::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    /// Move time backward
    pub fn rewind(&self, by: Duration) {
        *self.now.lock().unwrap() -= by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}

/// Channel that keeps every alert it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    received: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts received so far, in order
    pub fn received(&self) -> Vec<Alert> {
        self.received.lock().unwrap().clone()
    }
}

impl AlertChannel for RecordingChannel {
    fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        self.received.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
