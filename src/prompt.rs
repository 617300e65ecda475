//! Interactive collection of one call's metadata.
//!
//! The collector walks `CallId -> Duration -> Frequency -> Transcript`,
//! asking one question per step. The first invalid answer aborts the whole
//! session; there is no re-prompting.

use crate::core::{CallRecord, Field, RecordError};
use std::io::{BufRead, Write};

/// Collector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStage {
    Ask(Field),
    Done,
}

impl PromptStage {
    /// The stage that follows this one.
    pub fn next(self) -> Self {
        match self {
            PromptStage::Ask(Field::CallId) => PromptStage::Ask(Field::Duration),
            PromptStage::Ask(Field::Duration) => PromptStage::Ask(Field::Frequency),
            PromptStage::Ask(Field::Frequency) => PromptStage::Ask(Field::Transcript),
            PromptStage::Ask(Field::Transcript) | PromptStage::Done => PromptStage::Done,
        }
    }
}

/// Question shown for each field.
pub fn prompt_text(field: Field) -> &'static str {
    match field {
        Field::CallId => "Enter Call ID: ",
        Field::Duration => "Enter Call Duration (in seconds): ",
        Field::Frequency => "Enter Call Frequency: ",
        Field::Transcript => "Enter Call Transcript: ",
    }
}

/// Reads the four call fields from a console.
pub struct InputCollector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InputCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run one session and build the record.
    pub fn collect(&mut self) -> Result<CallRecord, InputError> {
        let mut answers: Vec<String> = Vec::with_capacity(4);
        let mut stage = PromptStage::Ask(Field::CallId);

        while let PromptStage::Ask(field) = stage {
            let answer = self.ask(field)?;
            field.check(&answer)?;
            answers.push(answer);
            stage = stage.next();
        }

        match answers.as_slice() {
            [id, duration, frequency, transcript] => {
                Ok(CallRecord::parse(id, duration, frequency, transcript)?)
            }
            _ => Err(InputError::Io("incomplete input".to_string())),
        }
    }

    /// Print the prompt for `field` and read one line. End of input reads as empty.
    fn ask(&mut self, field: Field) -> Result<String, InputError> {
        write!(self.output, "{}", prompt_text(field)).map_err(|e| InputError::Io(e.to_string()))?;
        self.output
            .flush()
            .map_err(|e| InputError::Io(e.to_string()))?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|e| InputError::Io(e.to_string()))?;
        Ok(line)
    }
}

/// Input collection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// An answer failed validation
    Invalid(Field),
    /// The console could not be read or written
    Io(String),
}

impl From<RecordError> for InputError {
    fn from(e: RecordError) -> Self {
        InputError::Invalid(e.field())
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Invalid(field) => write!(f, "Invalid {field}. Aborting analysis."),
            InputError::Io(e) => write!(f, "Console error: {e}"),
        }
    }
}

impl std::error::Error for InputError {}
