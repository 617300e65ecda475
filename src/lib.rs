//! Call Monitor - heuristic screening of phone calls for fraud indicators.
//!
//! Each call is described by an id, its duration, how often the caller has
//! called, and a transcript. The monitor flags a call when any of these
//! checks fire:
//!
//! - **Frequency**: more than 10 calls
//! - **Duration**: shorter than 10 seconds
//! - **Keywords**: the transcript contains a registered fraud indicator
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │    Input     │──▶│  Evaluator   │──▶│  Call Logger │──▶│   Notifier   │
//! │  Collector   │   │ (+ keywords) │   │ (JSON files) │   │ (if flagged) │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use call_monitor::{CallLogger, CallMonitor, CallRecord, KeywordRegistry, Notifier};
//!
//! let logger = CallLogger::open("call_logs").expect("Failed to create log directory");
//! let monitor = CallMonitor::new(KeywordRegistry::new(), logger, Notifier::disabled());
//!
//! let record = CallRecord::new("C1", 5, 3, "please share your password").unwrap();
//! let outcome = monitor.process(&record).unwrap();
//! assert!(outcome.verdict.flagged);
//! ```

pub mod alert;
pub mod audit;
pub mod config;
pub mod core;
pub mod monitor;
pub mod prompt;

// Re-export key types at crate root for convenience
pub use alert::{AlertError, AlertHandle, AlertMessage, MailTransport, Notifier, SmtpMailer};
pub use audit::{AuditError, CallLogger, LogEntry};
pub use config::{AlertConfig, Config, ConfigError};
pub use self::core::{
    evaluate, AddOutcome, CallRecord, CallRule, EvaluationError, Evaluator, Field,
    KeywordRegistry, RecordError, Verdict, VoiceAnalysisRule, VoiceAnalyzer,
};
pub use monitor::{CallMonitor, CallOutcome, MonitorError};
pub use prompt::{InputCollector, InputError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Startup line printed by the interactive session.
pub const READY_BANNER: &str = "Call Monitoring System Active. Ready to analyze calls.";
