use knobs_types::{EditorError, EditorValue, ValueFormat, parse_commit_text};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::ui::components::common::TextInputState;

/// Read-only configuration handed to the editor by its owner.
#[derive(Debug, Clone, Copy)]
pub struct EditorProps<'a> {
    /// Authoritative value, used for display only.
    pub committed: Option<&'a EditorValue>,
    pub format: ValueFormat,
    /// Editing is only possible while the link is up.
    pub connected: bool,
    /// One-line rendering.
    pub compact: bool,
    pub label: Option<&'a str>,
    /// Suffix for `number+units` parameters.
    pub units: Option<&'a str>,
}

impl<'a> EditorProps<'a> {
    pub fn new(format: ValueFormat, committed: Option<&'a EditorValue>) -> Self {
        Self {
            committed,
            format,
            connected: true,
            compact: false,
            label: None,
            units: None,
        }
    }

    /// Units only apply to `number+units`.
    pub fn units(&self) -> Option<&'a str> {
        self.units.filter(|_| self.format.has_units())
    }
}

/// The user's in-progress edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingValue {
    Toggle(bool),
    Text(TextInputState),
}

/// Where the editor is in its edit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// Untouched since mount or Esc; the placeholder shows the committed value
    /// and confirming re-sends it.
    Idle,
    /// The user changed the text, possibly back to empty.
    Editing,
}

/// Mutable state owned by one mounted editor.
#[derive(Debug, Clone)]
pub struct EditorState {
    pending: PendingValue,
    edited: bool,
    error: Option<String>,

    container_focus: FocusFlag,
    /// Text field or switch.
    pub f_input: FocusFlag,
    /// `Set` button; not part of the focus tree for boolean editors.
    pub f_confirm: FocusFlag,
}

impl EditorState {
    /// Creates the state for a freshly mounted editor.
    ///
    /// Switches start from the committed boolean (`false` when unset). Text
    /// editors start with an empty buffer in [`EditPhase::Idle`], where the
    /// committed value stands in for the text until the user edits it.
    pub fn mount(format: ValueFormat, committed: Option<&EditorValue>) -> Self {
        let pending = if format.is_boolean() {
            PendingValue::Toggle(committed.and_then(EditorValue::as_bool).unwrap_or(false))
        } else {
            PendingValue::Text(TextInputState::default())
        };
        Self {
            pending,
            edited: false,
            error: None,
            container_focus: FocusFlag::default(),
            f_input: FocusFlag::default(),
            f_confirm: FocusFlag::default(),
        }
    }

    pub fn pending(&self) -> &PendingValue {
        &self.pending
    }

    pub fn phase(&self) -> EditPhase {
        if self.edited { EditPhase::Editing } else { EditPhase::Idle }
    }

    pub fn toggle_value(&self) -> Option<bool> {
        match self.pending {
            PendingValue::Toggle(on) => Some(on),
            PendingValue::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&TextInputState> {
        match &self.pending {
            PendingValue::Text(buffer) => Some(buffer),
            PendingValue::Toggle(_) => None,
        }
    }

    /// Mutable access to the text buffer for cursor movement.
    pub fn text_mut(&mut self) -> Option<&mut TextInputState> {
        match &mut self.pending {
            PendingValue::Text(buffer) => Some(buffer),
            PendingValue::Toggle(_) => None,
        }
    }

    /// Applies a text change, moving to [`EditPhase::Editing`] and clearing the
    /// last error. Returns false for switches.
    pub fn edit_text(&mut self, change: impl FnOnce(&mut TextInputState)) -> bool {
        let PendingValue::Text(buffer) = &mut self.pending else {
            return false;
        };
        change(buffer);
        self.edited = true;
        self.error = None;
        true
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_focused(&self) -> bool {
        self.f_input.get() || self.f_confirm.get()
    }

    /// Flips the switch and returns the new value.
    pub fn flip(&mut self) -> Option<bool> {
        match &mut self.pending {
            PendingValue::Toggle(on) => {
                *on = !*on;
                Some(*on)
            }
            PendingValue::Text(_) => None,
        }
    }

    /// Discards the pending text and any error, returning to [`EditPhase::Idle`].
    pub fn clear_pending(&mut self) {
        if let PendingValue::Text(buffer) = &mut self.pending {
            buffer.clear();
        }
        self.edited = false;
        self.error = None;
    }

    /// Validates and parses the pending text.
    ///
    /// An untouched editor re-sends `committed`, or reports
    /// [`EditorError::EmptyInput`] when there is none. On failure the message
    /// is kept for inline display and nothing is returned. The text is left in
    /// place after a successful parse so the same value can be committed again.
    pub fn confirm(&mut self, format: ValueFormat, committed: Option<&EditorValue>) -> Option<EditorValue> {
        let PendingValue::Text(buffer) = &self.pending else {
            return None;
        };
        let parsed = match (self.edited, committed) {
            (false, Some(value)) => Ok(value.clone()),
            (false, None) => Err(EditorError::EmptyInput),
            (true, _) => parse_commit_text(format, buffer.input()),
        };
        match parsed {
            Ok(value) => {
                self.error = None;
                Some(value)
            }
            Err(error) => {
                debug!(format = %format, error = %error, "Rejected editor input");
                self.error = Some(error.to_string());
                None
            }
        }
    }
}

impl HasFocus for EditorState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        builder.leaf_widget(&self.f_input);
        if matches!(self.pending, PendingValue::Text(_)) {
            builder.leaf_widget(&self.f_confirm);
        }
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(format: ValueFormat, text: &str) -> EditorState {
        let mut state = EditorState::mount(format, None);
        assert!(state.edit_text(|buffer| buffer.set_input(text)));
        state
    }

    #[test]
    fn switch_is_seeded_from_committed_value() {
        let committed = EditorValue::Bool(true);
        assert_eq!(EditorState::mount(ValueFormat::Bool, Some(&committed)).toggle_value(), Some(true));
        assert_eq!(EditorState::mount(ValueFormat::Bool, None).toggle_value(), Some(false));
    }

    #[test]
    fn text_editor_starts_idle_even_with_committed_value() {
        let committed = EditorValue::from(12u64);
        let state = EditorState::mount(ValueFormat::Number, Some(&committed));
        assert_eq!(state.phase(), EditPhase::Idle);
        assert_eq!(state.text().map(TextInputState::input), Some(""));
    }

    #[test]
    fn flip_negates_and_reports_new_value() {
        let mut state = EditorState::mount(ValueFormat::Bool, None);
        assert_eq!(state.flip(), Some(true));
        assert_eq!(state.flip(), Some(false));
        assert_eq!(typed(ValueFormat::String, "x").flip(), None);
    }

    #[test]
    fn confirm_keeps_text_for_resubmission() {
        let mut state = typed(ValueFormat::Number, "42");
        assert_eq!(state.confirm(ValueFormat::Number, None), Some(EditorValue::from(42u64)));
        assert_eq!(state.confirm(ValueFormat::Number, None), Some(EditorValue::from(42u64)));
        assert_eq!(state.phase(), EditPhase::Editing);
    }

    #[test]
    fn malformed_input_sets_error_until_next_edit() {
        let mut state = typed(ValueFormat::Number, "abc");
        assert_eq!(state.confirm(ValueFormat::Number, None), None);
        assert!(state.error().is_some_and(|message| message.contains("not a valid number value")));

        state.text_mut().expect("text editor").move_home();
        assert!(state.error().is_some());
        assert!(state.edit_text(TextInputState::backspace));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn clear_pending_returns_to_idle() {
        let mut state = typed(ValueFormat::Number, "draft");
        assert_eq!(state.confirm(ValueFormat::Number, None), None);
        assert!(state.error().is_some());
        state.clear_pending();
        assert_eq!(state.phase(), EditPhase::Idle);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn untouched_editor_resends_committed_value() {
        let committed = EditorValue::from("bench-01");
        let mut state = EditorState::mount(ValueFormat::String, Some(&committed));
        assert_eq!(state.confirm(ValueFormat::String, Some(&committed)), Some(committed.clone()));
        assert_eq!(state.phase(), EditPhase::Idle);

        let mut unset = EditorState::mount(ValueFormat::String, None);
        assert_eq!(unset.confirm(ValueFormat::String, None), None);
        assert_eq!(unset.error(), Some("nothing to commit"));
    }

    #[test]
    fn string_editor_emptied_by_user_commits_empty_string() {
        let committed = EditorValue::from("bench-01");
        let mut state = typed(ValueFormat::String, "a");
        assert!(state.edit_text(TextInputState::backspace));
        assert_eq!(state.phase(), EditPhase::Editing);
        assert_eq!(state.confirm(ValueFormat::String, Some(&committed)), Some(EditorValue::from("")));

        let mut number = typed(ValueFormat::Number, "");
        assert_eq!(number.confirm(ValueFormat::Number, Some(&EditorValue::from(3u64))), None);
        assert_eq!(number.error(), Some("nothing to commit"));
    }

    #[test]
    fn units_only_apply_to_units_format() {
        let mut props = EditorProps::new(ValueFormat::Number, None);
        props.units = Some("Hz");
        assert_eq!(props.units(), None);
        props.format = ValueFormat::NumberWithUnits;
        assert_eq!(props.units(), Some("Hz"));
    }
}
