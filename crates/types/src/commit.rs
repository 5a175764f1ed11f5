//! Parsing of confirmed editor text into committed values.

use serde_json::Value;

use crate::{EditorError, EditorValue, ValueFormat};

/// Turns the text a user confirmed into a value of the given format.
///
/// - `string` commits the text verbatim.
/// - `number` and `number+units` trim surrounding whitespace, require the
///   digits pattern, then parse a JSON numeric literal (so `007` is rejected).
/// - `bool` requires `true`, `false`, `0` or `1`.
/// - `json` accepts any JSON literal.
///
/// An empty buffer is only valid for `string`; every parsed format rejects it
/// with [`EditorError::EmptyInput`].
pub fn parse_commit_text(format: ValueFormat, text: &str) -> Result<EditorValue, EditorError> {
    if text.is_empty() && format != ValueFormat::String {
        return Err(EditorError::EmptyInput);
    }

    match format {
        ValueFormat::String => Ok(EditorValue::Str(text.to_string())),
        ValueFormat::Number | ValueFormat::NumberWithUnits => {
            let candidate = text.trim();
            if !format.validation_pattern().is_match(candidate) {
                return Err(EditorError::malformed(format, text, "digits only"));
            }
            match serde_json::from_str::<Value>(candidate) {
                Ok(Value::Number(number)) => Ok(EditorValue::Number(number)),
                Ok(_) => Err(EditorError::malformed(format, text, "not a number")),
                Err(error) => Err(EditorError::malformed(format, text, error.to_string())),
            }
        }
        ValueFormat::Bool => {
            let candidate = text.trim();
            if !format.validation_pattern().is_match(candidate) {
                return Err(EditorError::malformed(format, text, "expected true, false, 0 or 1"));
            }
            Ok(EditorValue::Bool(matches!(candidate, "true" | "1")))
        }
        ValueFormat::Json => serde_json::from_str::<Value>(text.trim())
            .map(EditorValue::from)
            .map_err(|error| EditorError::malformed(format, text, error.to_string())),
    }
}

/// Placeholder shown in an empty field: the committed value annotated as current.
pub fn placeholder_text(committed: Option<&EditorValue>, units: Option<&str>) -> String {
    let Some(value) = committed else {
        return "unset (current)".to_string();
    };
    match units.map(str::trim).filter(|units| !units.is_empty()) {
        Some(units) => format!("{value} {units} (current)"),
        None => format!("{value} (current)"),
    }
}
