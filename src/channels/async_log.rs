//! Background log file channel
//!
//! `send` only enqueues onto a bounded queue; a dedicated writer thread
//! appends queued messages to the log file. When the queue is full the
//! message is dropped and the caller gets [`ChannelError::QueueFull`].
//!
//! Shutdown runs in two phases:
//! 1. close the queue to new messages and wait until every accepted message
//!    has been written;
//! 2. raise the stop flag and join the writer, giving up after
//!    `shutdown_timeout`.
//!
//! Closing before draining means a message is either rejected with
//! [`ChannelError::QueueClosed`] or written; none is silently left behind.

use super::log_file::append_line;
use super::AlertChannel;
use crate::domain::Alert;
use crate::error::ChannelError;
use crossbeam_channel::{self as channel, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::{Condvar, Mutex};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Tuning for the background writer
#[derive(Debug, Clone)]
pub struct AsyncLogOptions {
    /// Maximum number of queued messages
    pub capacity: usize,
    /// How long the writer waits on an empty queue before rechecking the stop flag
    pub poll_interval: Duration,
    /// Upper bound on joining the writer during shutdown
    pub shutdown_timeout: Duration,
    /// Start with the writer paused (nothing is written until `resume`)
    pub start_paused: bool,
}

impl Default for AsyncLogOptions {
    fn default() -> Self {
        Self {
            capacity: 1000,
            poll_interval: Duration::from_millis(500),
            shutdown_timeout: Duration::from_secs(2),
            start_paused: false,
        }
    }
}

/// Count of accepted-but-unwritten messages
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn new() -> Self {
        Self {
            count: Mutex::new(0),
            idle: Condvar::new(),
        }
    }

    fn begin(&self) {
        *self.count.lock() += 1;
    }

    fn finish(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn get(&self) -> usize {
        *self.count.lock()
    }

    fn wait_idle(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.idle.wait(&mut count);
        }
    }
}

/// Pause switch for the writer
struct Gate {
    paused: Mutex<bool>,
    resumed: Condvar,
}

impl Gate {
    fn new(paused: bool) -> Self {
        Self {
            paused: Mutex::new(paused),
            resumed: Condvar::new(),
        }
    }

    fn pause(&self) {
        *self.paused.lock() = true;
    }

    fn resume(&self) {
        *self.paused.lock() = false;
        self.resumed.notify_all();
    }

    fn wait_open(&self) {
        let mut paused = self.paused.lock();
        while *paused {
            self.resumed.wait(&mut paused);
        }
    }
}

/// State shared with the writer thread
struct Shared {
    path: PathBuf,
    pending: Pending,
    gate: Gate,
    stop: AtomicBool,
}

/// Log file channel with a bounded queue and a background writer
pub struct AsyncLogFileChannel {
    shared: Arc<Shared>,
    sender: Mutex<Option<Sender<String>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    done: Receiver<()>,
    options: AsyncLogOptions,
}

impl AsyncLogFileChannel {
    /// Start a writer for `path`
    pub fn with_options(
        path: impl Into<PathBuf>,
        options: AsyncLogOptions,
    ) -> Result<Self, ChannelError> {
        let shared = Arc::new(Shared {
            path: path.into(),
            pending: Pending::new(),
            gate: Gate::new(options.start_paused),
            stop: AtomicBool::new(false),
        });

        let (tx, rx) = channel::bounded(options.capacity.max(1));
        let (done_tx, done_rx) = channel::bounded(1);

        let worker_shared = Arc::clone(&shared);
        let poll_interval = options.poll_interval;
        let handle = thread::Builder::new()
            .name("sentinel-log-writer".to_string())
            .spawn(move || run_writer(worker_shared, rx, done_tx, poll_interval))
            .map_err(ChannelError::WorkerSpawn)?;

        log::info!(
            "Started async log writer for {} (capacity {})",
            shared.path.display(),
            options.capacity.max(1)
        );

        Ok(Self {
            shared,
            sender: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(handle)),
            done: done_rx,
            options,
        })
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Messages accepted but not yet written
    pub fn queued(&self) -> usize {
        self.shared.pending.get()
    }

    /// Whether the queue still accepts messages
    pub fn is_open(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Hold the writer before its next dequeue. A message already being
    /// received may still be written. Has no effect once shutdown has begun.
    pub fn pause(&self) {
        // Sender lock orders this against the close in `shutdown`.
        let sender = self.sender.lock();
        if sender.is_some() {
            self.shared.gate.pause();
        }
    }

    /// Let a paused writer continue
    pub fn resume(&self) {
        self.shared.gate.resume();
    }

    /// Close the queue, write everything accepted so far, then stop the writer.
    ///
    /// Idempotent; only the first call does any work.
    pub fn shutdown(&self) {
        let Some(sender) = self.sender.lock().take() else {
            return;
        };
        drop(sender);

        log::debug!(
            "Draining {} queued alert(s) to {}",
            self.shared.pending.get(),
            self.shared.path.display()
        );
        self.shared.gate.resume();
        self.shared.pending.wait_idle();

        self.shared.stop.store(true, Ordering::Release);

        let Some(handle) = self.worker.lock().take() else {
            return;
        };
        match self.done.recv_timeout(self.options.shutdown_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    log::warn!("Async log writer terminated abnormally");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "Async log writer did not stop within {:?}, detaching",
                    self.options.shutdown_timeout
                );
            }
        }

        log::info!("Stopped async log writer for {}", self.shared.path.display());
    }
}

impl AlertChannel for AsyncLogFileChannel {
    fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        let sender = self.sender.lock();
        let Some(tx) = sender.as_ref() else {
            return Err(ChannelError::QueueClosed);
        };

        // Counted before the push so the writer can never finish it first.
        self.shared.pending.begin();
        match tx.try_send(alert.message.clone()) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.shared.pending.finish();
                Err(match e {
                    TrySendError::Full(_) => ChannelError::QueueFull,
                    TrySendError::Disconnected(_) => ChannelError::QueueClosed,
                })
            }
        }
    }

    fn name(&self) -> &str {
        "async-log"
    }

    fn shutdown(&self) {
        AsyncLogFileChannel::shutdown(self);
    }
}

impl Drop for AsyncLogFileChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_writer(shared: Arc<Shared>, rx: Receiver<String>, done: Sender<()>, poll: Duration) {
    while !shared.stop.load(Ordering::Acquire) {
        shared.gate.wait_open();

        match rx.recv_timeout(poll) {
            Ok(message) => {
                // No caller is waiting on this write, so failures go to the log.
                if let Err(e) = append_line(&shared.path, &message) {
                    log::error!("Async log write error ({}): {}", shared.path.display(), e);
                }
                shared.pending.finish();
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let _ = done.send(());
}
