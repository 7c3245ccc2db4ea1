//! Logging module for the dataset preparation tools
//!
//! This module provides:
//! - Custom log formatting with bracketed output
//! - Stdout logging plus an optional timestamped log file
//! - A scoped bootstrap subscriber for startup work done before logging is configured

mod formatter;
mod setup;

// Re-export the public API
pub use setup::{setup_logging, with_bootstrap_logging};
