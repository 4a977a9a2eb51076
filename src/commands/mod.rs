//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod config;
pub mod process;

pub use config::run_config;
pub use process::run_process;
