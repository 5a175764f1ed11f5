use thiserror::Error;

use crate::ValueFormat;

/// Failure surfaced while turning user or configuration input into an
/// [`EditorValue`](crate::EditorValue).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The text does not match the format's pattern or is not a valid literal.
    #[error("'{input}' is not a valid {format} value: {reason}")]
    MalformedInput {
        format: ValueFormat,
        input: String,
        reason: String,
    },
    /// Confirm was requested while the text buffer was empty.
    #[error("nothing to commit")]
    EmptyInput,
    /// A format tag outside the known set.
    #[error("unknown value format '{0}'; expected one of number, number+units, bool, string, json")]
    UnknownFormat(String),
    /// A configured value whose shape contradicts its declared format.
    #[error("{value} is not a {format} value")]
    ValueMismatch { format: ValueFormat, value: String },
}

impl EditorError {
    pub(crate) fn malformed(format: ValueFormat, input: &str, reason: impl Into<String>) -> Self {
        EditorError::MalformedInput {
            format,
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the text a user typed.
    pub fn is_input_error(&self) -> bool {
        matches!(self, EditorError::MalformedInput { .. } | EditorError::EmptyInput)
    }
}
