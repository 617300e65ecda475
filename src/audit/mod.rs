//! Audit module for the call monitor.
//!
//! Keeps a permanent, one-file-per-call record of every evaluated call
//! together with its verdict.

pub mod log;

// Re-export commonly used types
pub use log::{AuditError, CallLogger, LogEntry};
