use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{EditorError, ValueFormat};

/// A parameter value, tagged by shape.
///
/// Serializes as the plain JSON literal it represents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditorValue {
    Number(Number),
    Bool(bool),
    Str(String),
    /// Arrays, objects and `null`.
    Structured(Value),
}

impl EditorValue {
    /// Checks a configured value against its declared format.
    ///
    /// Boolean formats also accept `0`, `1`, `"true"` and `"false"`, which is the
    /// set matched by the boolean validation pattern.
    pub fn for_format(format: ValueFormat, value: Value) -> Result<Self, EditorError> {
        let mismatch = |value: &Value| EditorError::ValueMismatch {
            format,
            value: value.to_string(),
        };
        match format {
            ValueFormat::Number | ValueFormat::NumberWithUnits => match value {
                Value::Number(number) => Ok(EditorValue::Number(number)),
                other => Err(mismatch(&other)),
            },
            ValueFormat::Bool => match &value {
                Value::Bool(flag) => Ok(EditorValue::Bool(*flag)),
                Value::Number(number) => match number.as_u64() {
                    Some(0) => Ok(EditorValue::Bool(false)),
                    Some(1) => Ok(EditorValue::Bool(true)),
                    _ => Err(mismatch(&value)),
                },
                Value::String(text) => match text.as_str() {
                    "true" | "1" => Ok(EditorValue::Bool(true)),
                    "false" | "0" => Ok(EditorValue::Bool(false)),
                    _ => Err(mismatch(&value)),
                },
                _ => Err(mismatch(&value)),
            },
            ValueFormat::String => match value {
                Value::String(text) => Ok(EditorValue::Str(text)),
                other => Err(mismatch(&other)),
            },
            ValueFormat::Json => Ok(EditorValue::from(value)),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EditorValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

impl From<Value> for EditorValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) => EditorValue::Number(number),
            Value::Bool(flag) => EditorValue::Bool(flag),
            Value::String(text) => EditorValue::Str(text),
            other => EditorValue::Structured(other),
        }
    }
}

impl From<EditorValue> for Value {
    fn from(value: EditorValue) -> Self {
        match value {
            EditorValue::Number(number) => Value::Number(number),
            EditorValue::Bool(flag) => Value::Bool(flag),
            EditorValue::Str(text) => Value::String(text),
            EditorValue::Structured(other) => other,
        }
    }
}

impl From<bool> for EditorValue {
    fn from(flag: bool) -> Self {
        EditorValue::Bool(flag)
    }
}

impl From<u64> for EditorValue {
    fn from(number: u64) -> Self {
        EditorValue::Number(Number::from(number))
    }
}

impl From<&str> for EditorValue {
    fn from(text: &str) -> Self {
        EditorValue::Str(text.to_string())
    }
}

/// Strings display without quotes; everything else displays as compact JSON.
impl fmt::Display for EditorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorValue::Number(number) => write!(f, "{number}"),
            EditorValue::Bool(flag) => write!(f, "{flag}"),
            EditorValue::Str(text) => f.write_str(text),
            EditorValue::Structured(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_format_accepts_pattern_equivalents() {
        assert_eq!(EditorValue::for_format(ValueFormat::Bool, json!(1)), Ok(EditorValue::Bool(true)));
        assert_eq!(EditorValue::for_format(ValueFormat::Bool, json!("false")), Ok(EditorValue::Bool(false)));
        assert!(EditorValue::for_format(ValueFormat::Bool, json!(2)).is_err());
        assert!(EditorValue::for_format(ValueFormat::Bool, json!("yes")).is_err());
    }

    #[test]
    fn numeric_format_rejects_strings() {
        let error = EditorValue::for_format(ValueFormat::Number, json!("42")).expect_err("string is not a number");
        assert_eq!(
            error,
            EditorError::ValueMismatch {
                format: ValueFormat::Number,
                value: "\"42\"".to_string()
            }
        );
    }

    #[test]
    fn json_format_normalizes_scalars() {
        assert_eq!(EditorValue::for_format(ValueFormat::Json, json!("x")), Ok(EditorValue::Str("x".into())));
        assert_eq!(
            EditorValue::for_format(ValueFormat::Json, json!([1, 2])),
            Ok(EditorValue::Structured(json!([1, 2])))
        );
    }

    #[test]
    fn serializes_as_plain_literal() {
        assert_eq!(serde_json::to_string(&EditorValue::from(42u64)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&EditorValue::from("hi")).unwrap(), "\"hi\"");
        let parsed: EditorValue = serde_json::from_str("{\"a\":1}").unwrap();
        assert_eq!(parsed, EditorValue::Structured(json!({"a": 1})));
    }

    #[test]
    fn display_leaves_strings_unquoted() {
        assert_eq!(EditorValue::from("hello").to_string(), "hello");
        assert_eq!(EditorValue::Structured(json!(null)).to_string(), "null");
    }
}
