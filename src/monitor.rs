//! The per-call pipeline: evaluate, log, then notify.
//!
//! Calls are processed one at a time. The log entry is always written
//! before any notification is attempted.

use crate::alert::{AlertHandle, Notifier};
use crate::audit::{AuditError, CallLogger};
use crate::core::{CallRecord, EvaluationError, Evaluator, KeywordRegistry, Verdict};
use std::path::PathBuf;

/// Result of processing one call.
#[derive(Debug)]
pub struct CallOutcome {
    pub verdict: Verdict,
    /// Path of the log entry; `None` only when a write failed in tolerant mode
    pub log_path: Option<PathBuf>,
    /// In-flight email alert, when one was started
    pub alert: Option<AlertHandle>,
}

/// Owns the keyword registry and the collaborators of the pipeline.
#[derive(Debug)]
pub struct CallMonitor {
    keywords: KeywordRegistry,
    evaluator: Evaluator,
    logger: CallLogger,
    notifier: Notifier,
    strict_audit: bool,
}

impl CallMonitor {
    pub fn new(keywords: KeywordRegistry, logger: CallLogger, notifier: Notifier) -> Self {
        Self {
            keywords,
            evaluator: Evaluator::new(),
            logger,
            notifier,
            strict_audit: true,
        }
    }

    /// Replace the evaluator, e.g. to register extra rules.
    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Choose whether a failed log write aborts the call.
    pub fn with_strict_audit(mut self, strict: bool) -> Self {
        self.strict_audit = strict;
        self
    }

    pub fn keywords_mut(&mut self) -> &mut KeywordRegistry {
        &mut self.keywords
    }

    pub fn logger(&self) -> &CallLogger {
        &self.logger
    }

    /// Evaluate, log and (if flagged) notify for a single call.
    pub fn process(&self, record: &CallRecord) -> Result<CallOutcome, MonitorError> {
        tracing::info!("Monitoring Call ID: {}", record.id());

        let verdict = self.evaluator.evaluate(record, &self.keywords)?;

        let log_path = match self.logger.log(record, &verdict) {
            Ok(path) => Some(path),
            Err(e) if self.strict_audit => return Err(MonitorError::Audit(e)),
            Err(e) => {
                tracing::error!("{e}");
                None
            }
        };

        let alert = if verdict.flagged {
            tracing::warn!("Call ID {} flagged: {}", record.id(), verdict.summary());
            self.notifier.notify(record, &verdict)
        } else {
            tracing::info!("Call ID {} passed all checks.", record.id());
            None
        };

        Ok(CallOutcome {
            verdict,
            log_path,
            alert,
        })
    }
}

/// Errors that leave a call unresolved.
#[derive(Debug)]
pub enum MonitorError {
    Evaluation(EvaluationError),
    Audit(AuditError),
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::Evaluation(e) => {
                write!(f, "An error occurred while monitoring the call: {e}")
            }
            MonitorError::Audit(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Evaluation(e) => Some(e),
            MonitorError::Audit(e) => Some(e),
        }
    }
}

impl From<EvaluationError> for MonitorError {
    fn from(e: EvaluationError) -> Self {
        MonitorError::Evaluation(e)
    }
}

impl From<AuditError> for MonitorError {
    fn from(e: AuditError) -> Self {
        MonitorError::Audit(e)
    }
}
