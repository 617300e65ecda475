//! Core functionality for the call monitor.
//!
//! This module contains:
//! - Call records and input validation
//! - The keyword registry
//! - Call evaluation into a verdict

pub mod evaluator;
pub mod keywords;
pub mod record;

// Re-export commonly used types
pub use evaluator::{
    evaluate, CallRule, EvaluationError, Evaluator, Verdict, VoiceAnalysisRule, VoiceAnalyzer,
    FREQUENCY_THRESHOLD, MIN_DURATION_SECS,
};
pub use keywords::{AddOutcome, KeywordError, KeywordRegistry, DEFAULT_KEYWORDS};
pub use record::{CallRecord, Field, RecordError};
