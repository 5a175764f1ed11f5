//! Value formats and their validation patterns.
//!
//! A format is the declared kind of a parameter. It decides how the editor
//! renders (toggle or text field), which pattern typed text must satisfy, and
//! how confirmed text is parsed into an [`EditorValue`](crate::EditorValue).

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::EditorError;

static DIGITS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("digits pattern compiles"));
static BOOLEAN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(true|false|0|1)$").expect("boolean pattern compiles"));
static ANY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^.*$").expect("accept-all pattern compiles"));

/// Declared kind of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueFormat {
    /// Non-negative integer literal.
    Number,
    /// Non-negative integer literal displayed with a units suffix.
    NumberWithUnits,
    /// On/off value rendered as a toggle.
    Bool,
    /// Free text committed verbatim.
    #[default]
    String,
    /// Any JSON literal.
    Json,
}

impl ValueFormat {
    pub const ALL: [ValueFormat; 5] = [
        ValueFormat::Number,
        ValueFormat::NumberWithUnits,
        ValueFormat::Bool,
        ValueFormat::String,
        ValueFormat::Json,
    ];

    /// Canonical tag used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueFormat::Number => "number",
            ValueFormat::NumberWithUnits => "number+units",
            ValueFormat::Bool => "bool",
            ValueFormat::String => "string",
            ValueFormat::Json => "json",
        }
    }

    /// Pattern that committed text must satisfy.
    pub fn validation_pattern(&self) -> &'static Regex {
        match self {
            ValueFormat::Number | ValueFormat::NumberWithUnits => &DIGITS_PATTERN,
            ValueFormat::Bool => &BOOLEAN_PATTERN,
            ValueFormat::String | ValueFormat::Json => &ANY_PATTERN,
        }
    }

    /// Boolean formats render as a toggle and commit on every flip.
    pub fn is_boolean(&self) -> bool {
        matches!(self, ValueFormat::Bool)
    }

    /// Whether the format carries a units label next to the value.
    pub fn has_units(&self) -> bool {
        matches!(self, ValueFormat::NumberWithUnits)
    }

    /// Short prompt shown next to the field when no label is configured.
    pub fn prompt(&self) -> &'static str {
        match self {
            ValueFormat::Number | ValueFormat::NumberWithUnits => "Enter a whole number",
            ValueFormat::Bool => "Toggle on or off",
            ValueFormat::String => "Enter text",
            ValueFormat::Json => "Enter a JSON literal",
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueFormat {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(ValueFormat::Number),
            "number+units" => Ok(ValueFormat::NumberWithUnits),
            "bool" => Ok(ValueFormat::Bool),
            "string" => Ok(ValueFormat::String),
            "json" => Ok(ValueFormat::Json),
            _ => Err(EditorError::UnknownFormat(s.to_string())),
        }
    }
}

impl Serialize for ValueFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValueFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}
