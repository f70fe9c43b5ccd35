//! # envsmith Core
//!
//! Core utilities, configuration management, logging, and common functionality
//! for the envsmith configuration engine.
//!
//! This crate provides:
//!
//! - **Configuration**: Multi-layer configuration (defaults, file, flags, environment)
//! - **Logging**: Structured logging to stderr and configured log files
//! - **Terminal**: Terminal detection and status formatting
//! - **File Operations**: The local [`FileStore`](envsmith_types::FileStore), path utilities
//! - **Time Utilities**: Backup timestamps, duration formatting

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod term;
pub mod util;
pub mod time;

// Re-export commonly used items
pub use config::{Config, ControlFlags, Settings};
pub use envsmith_types::{EnvsmithError, Result};

/// envsmith application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// envsmith application name
pub const APP_NAME: &str = "envsmith";
