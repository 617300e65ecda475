//! Call metadata and the validation rules applied to it.
//!
//! A [`CallRecord`] can only be built through [`CallRecord::new`] or
//! [`CallRecord::parse`], so every record that reaches the evaluator has a
//! non-empty id and transcript and strictly positive numeric fields.

use serde::Serialize;

/// Metadata for a single monitored call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    id: String,
    duration_secs: u64,
    frequency: u64,
    transcript: String,
}

impl CallRecord {
    /// Build a record from already-typed values.
    pub fn new(
        id: &str,
        duration_secs: u64,
        frequency: u64,
        transcript: &str,
    ) -> Result<Self, RecordError> {
        let id = validate_text(id).ok_or(RecordError::InvalidInput(Field::CallId))?;
        if duration_secs == 0 {
            return Err(RecordError::InvalidInput(Field::Duration));
        }
        if frequency == 0 {
            return Err(RecordError::InvalidInput(Field::Frequency));
        }
        let transcript =
            validate_text(transcript).ok_or(RecordError::InvalidInput(Field::Transcript))?;

        Ok(Self {
            id,
            duration_secs,
            frequency,
            transcript,
        })
    }

    /// Build a record from raw text fields, validating them in prompt order.
    pub fn parse(
        id: &str,
        duration: &str,
        frequency: &str,
        transcript: &str,
    ) -> Result<Self, RecordError> {
        let id = validate_text(id).ok_or(RecordError::InvalidInput(Field::CallId))?;
        let duration_secs =
            validate_number(duration).ok_or(RecordError::InvalidInput(Field::Duration))?;
        let frequency =
            validate_number(frequency).ok_or(RecordError::InvalidInput(Field::Frequency))?;
        let transcript =
            validate_text(transcript).ok_or(RecordError::InvalidInput(Field::Transcript))?;

        Ok(Self {
            id,
            duration_secs,
            frequency,
            transcript,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }
}

/// The four input fields of a call, in the order they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CallId,
    Duration,
    Frequency,
    Transcript,
}

impl Field {
    /// Check raw input for this field without building a record.
    pub fn check(self, input: &str) -> Result<(), RecordError> {
        let valid = match self {
            Field::CallId | Field::Transcript => validate_text(input).is_some(),
            Field::Duration | Field::Frequency => validate_number(input).is_some(),
        };
        if valid {
            Ok(())
        } else {
            Err(RecordError::InvalidInput(self))
        }
    }

    /// Human-readable field name used in prompts and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::CallId => "Call ID",
            Field::Duration => "duration",
            Field::Frequency => "frequency",
            Field::Transcript => "transcript",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse the leading base-10 integer of `input`, which must be positive.
///
/// Like a lenient `parseInt`: surrounding whitespace and an optional sign are
/// accepted, and parsing stops at the first non-digit, so `"12abc"` and
/// `"12.5"` both read as 12. Values too large for `u64` saturate.
pub fn validate_number(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].bytes().fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    });

    if negative || value == 0 {
        None
    } else {
        Some(value)
    }
}

/// Trim text input, rejecting it when nothing is left.
pub fn validate_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Record validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    InvalidInput(Field),
}

impl RecordError {
    /// The field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            RecordError::InvalidInput(field) => *field,
        }
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::InvalidInput(field) => write!(f, "Invalid {field}"),
        }
    }
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_record() {
        let record = CallRecord::parse("  C1 ", "5", " 3 ", "please share your password").unwrap();
        assert_eq!(record.id(), "C1");
        assert_eq!(record.duration_secs(), 5);
        assert_eq!(record.frequency(), 3);
        assert_eq!(record.transcript(), "please share your password");
    }

    #[test]
    fn test_number_validation() {
        assert_eq!(validate_number("42"), Some(42));
        assert_eq!(validate_number(" 7\n"), Some(7));
        assert_eq!(validate_number("0"), None);
        assert_eq!(validate_number("-3"), None);
        assert_eq!(validate_number("12abc"), Some(12));
        assert_eq!(validate_number("12.5"), Some(12));
        assert_eq!(validate_number("+8"), Some(8));
        assert_eq!(validate_number("4294967296"), Some(4_294_967_296));
        assert_eq!(validate_number("99999999999999999999999"), Some(u64::MAX));
        assert_eq!(validate_number("abc12"), None);
        assert_eq!(validate_number("-"), None);
        assert_eq!(validate_number("0012"), Some(12));
        assert_eq!(validate_number("000"), None);
        assert_eq!(validate_number(""), None);
    }

    #[test]
    fn test_parse_lenient_numbers() {
        let record = CallRecord::parse("C1", "4294967296", "3 calls", "hello").unwrap();
        assert_eq!(record.duration_secs(), 4_294_967_296);
        assert_eq!(record.frequency(), 3);

        let record = CallRecord::parse("C1", "12.5", "12abc", "hello").unwrap();
        assert_eq!(record.duration_secs(), 12);
        assert_eq!(record.frequency(), 12);
    }

    #[test]
    fn test_text_validation() {
        assert_eq!(validate_text("  hi  "), Some("hi".to_string()));
        assert_eq!(validate_text("   "), None);
        assert_eq!(validate_text(""), None);
    }

    #[test]
    fn test_parse_reports_first_invalid_field() {
        let err = CallRecord::parse("", "abc", "0", "").unwrap_err();
        assert_eq!(err.field(), Field::CallId);

        let err = CallRecord::parse("C1", "abc", "0", "").unwrap_err();
        assert_eq!(err.field(), Field::Duration);

        let err = CallRecord::parse("C1", "10", "0", "").unwrap_err();
        assert_eq!(err.field(), Field::Frequency);

        let err = CallRecord::parse("C1", "10", "1", "  ").unwrap_err();
        assert_eq!(err.field(), Field::Transcript);
        assert_eq!(err.to_string(), "Invalid transcript");
    }

    #[test]
    fn test_field_check() {
        assert!(Field::CallId.check("C9").is_ok());
        assert!(Field::Duration.check("0").is_err());
        assert_eq!(
            Field::Frequency.check("x").unwrap_err().to_string(),
            "Invalid frequency"
        );
    }

    #[test]
    fn test_new_rejects_zero() {
        assert_eq!(
            CallRecord::new("C1", 0, 1, "hi").unwrap_err(),
            RecordError::InvalidInput(Field::Duration)
        );
        assert_eq!(
            CallRecord::new("C1", 1, 0, "hi").unwrap_err(),
            RecordError::InvalidInput(Field::Frequency)
        );
    }
}
