//! Per-call audit log.
//!
//! Every processed call is written to its own JSON file under the log
//! directory. Files are created with create-new semantics and are never
//! appended to or rewritten.

use crate::core::{CallRecord, Verdict};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Upper bound on `-N` suffixes tried when a file name is already taken.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// One audit record, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    #[serde(rename = "callID")]
    pub call_id: String,
    pub duration: u64,
    pub frequency: u64,
    pub transcript: String,
    pub flagged: bool,
    pub reasons: Vec<String>,
}

impl LogEntry {
    /// Build an entry for a call evaluated at `at`.
    pub fn new(record: &CallRecord, verdict: &Verdict, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: iso_timestamp(at),
            call_id: record.id().to_string(),
            duration: record.duration_secs(),
            frequency: record.frequency(),
            transcript: record.transcript().to_string(),
            flagged: verdict.flagged,
            reasons: verdict.reasons.clone(),
        }
    }
}

/// Writes one JSON file per call into a log directory.
#[derive(Debug, Clone)]
pub struct CallLogger {
    dir: PathBuf,
}

impl CallLogger {
    /// Open a logger, creating the log directory if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let dir = dir.into();

        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| AuditError::CreateDir {
                path: dir.clone(),
                message: e.to_string(),
            })?;
            tracing::info!("Logging directory created at {}", dir.display());
        }

        Ok(Self { dir })
    }

    /// The directory log files are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the log entry for a call, returning the new file's path.
    pub fn log(&self, record: &CallRecord, verdict: &Verdict) -> Result<PathBuf, AuditError> {
        let now = Utc::now();
        let entry = LogEntry::new(record, verdict, now);
        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| AuditError::Serialize(e.to_string()))?;

        let stem = format!("{}_{}", safe_file_stem(record.id()), file_timestamp(now));
        let path = self.write_new(&stem, json.as_bytes())?;

        tracing::info!("Logged call details to {}", path.display());
        Ok(path)
    }

    /// Write `contents` to `<stem>.json`, or `<stem>-N.json` if that name is taken.
    fn write_new(&self, stem: &str, contents: &[u8]) -> Result<PathBuf, AuditError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stem}.json")
            } else {
                format!("{stem}-{attempt}.json")
            };
            let path = self.dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(contents)
                        .and_then(|_| file.sync_all())
                        .map_err(|e| AuditError::Write {
                            path: path.clone(),
                            message: e.to_string(),
                        })?;
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AuditError::Write {
                        path,
                        message: e.to_string(),
                    })
                }
            }
        }

        Err(AuditError::Write {
            path: self.dir.join(format!("{stem}.json")),
            message: "no unused file name available".to_string(),
        })
    }
}

/// ISO-8601 UTC timestamp with millisecond precision.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Timestamp usable in a file name (`:` and `.` replaced).
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    iso_timestamp(at).replace([':', '.'], "-")
}

/// Restrict a call id to characters that are safe in a file name.
fn safe_file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Audit log errors.
#[derive(Debug)]
pub enum AuditError {
    CreateDir { path: PathBuf, message: String },
    Serialize(String),
    Write { path: PathBuf, message: String },
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditError::CreateDir { path, message } => {
                write!(f, "Failed to create log directory {}: {message}", path.display())
            }
            AuditError::Serialize(e) => write!(f, "Failed to serialize call details: {e}"),
            AuditError::Write { path, message } => {
                write!(f, "Failed to log call details to {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for AuditError {}
