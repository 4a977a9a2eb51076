//! sentinel - threshold-based system metric alerting
//!
//! This library evaluates metric snapshots against configured thresholds,
//! throttles repeated alerts per metric, and delivers formatted alerts to
//! pluggable channels.
//!
//! # Modules
//!
//! - [`alerts`]: Throttling and batch statistics
//! - [`channels`]: Delivery channels and the channel registry
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Snapshots, severities and alert records
//! - [`error`]: Error types
//! - [`services`]: The processing pipeline

pub mod alerts;
pub mod channels;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
pub mod mock;

pub use error::{AppError, Result};
pub use services::{ProcessingResult, SystemMonitor};
