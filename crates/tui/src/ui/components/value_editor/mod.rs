//! Typed value editor: a toggle for boolean parameters, a text field plus a
//! `Set` button for everything else.
//!
//! The state container is owned by whoever mounts the editor (the parameter
//! panel). Inbound configuration arrives as an [`EditorProps`] snapshot on every
//! render and event; the only outbound signal is the committed
//! [`EditorValue`](knobs_types::EditorValue) returned from the event handlers.

mod state;
mod value_editor_view;

pub use state::{EditPhase, EditorProps, EditorState, PendingValue};
pub use value_editor_view::{EditorTarget, ValueEditorView};
