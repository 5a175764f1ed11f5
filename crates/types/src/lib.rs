//! Shared value types for Knobs.
//!
//! Everything the editor needs to know about a parameter's shape lives here:
//! the declared [`ValueFormat`], the tagged [`EditorValue`], the parser that
//! turns confirmed text into a value, and the [`EditorError`] taxonomy. The
//! crate has no UI dependencies so the CLI can reuse the same parsing rules.

mod commit;
mod error;
mod format;
mod value;

pub use commit::{parse_commit_text, placeholder_text};
pub use error::EditorError;
pub use format::ValueFormat;
pub use value::EditorValue;
