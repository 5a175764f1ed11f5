use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use knobs_types::{EditorValue, placeholder_text};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::debug;

use crate::ui::components::common::TextInputState;
use crate::ui::components::common::toggle::{TOGGLE_WIDTH, Toggle, is_toggle_key};
use crate::ui::components::value_editor::state::{EditPhase, EditorProps, EditorState, PendingValue};
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{self as th, ButtonRenderOptions, build_hint_spans};

const CONFIRM_LABEL: &str = "Set";
const CONFIRM_WIDTH: u16 = 7;
const MAX_LABEL_WIDTH: u16 = 20;

/// Part of the editor under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTarget {
    /// Text field or switch.
    Input,
    Confirm,
}

/// Tracks rendered rectangles for pointer hit-testing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditorLayoutState {
    pub label_area: Rect,
    pub field_area: Rect,
    pub confirm_area: Rect,
    pub message_area: Rect,
}

/// Handles rendering and interaction for one value editor.
#[derive(Debug, Default)]
pub struct ValueEditorView {
    layout: EditorLayoutState,
}

impl ValueEditorView {
    /// Rows needed to draw the editor.
    pub fn preferred_height(props: &EditorProps) -> u16 {
        if props.compact { 1 } else { 4 }
    }

    /// Handles a key while this editor is selected; returns the value to commit.
    pub fn handle_key_events(&mut self, state: &mut EditorState, props: &EditorProps, key: KeyEvent) -> Option<EditorValue> {
        if !props.connected {
            return None;
        }

        if matches!(state.pending(), PendingValue::Toggle(_)) {
            if is_toggle_key(&key) {
                return state.flip().map(EditorValue::Bool);
            }
            return None;
        }

        match key.code {
            KeyCode::Enter => return self.submit(state, props),
            KeyCode::Esc => {
                state.clear_pending();
                return None;
            }
            _ => {}
        }

        if state.f_confirm.get() || key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }

        let edited = match key.code {
            KeyCode::Backspace => state.edit_text(TextInputState::backspace),
            KeyCode::Delete => state.edit_text(TextInputState::delete),
            KeyCode::Char(character) if !character.is_control() => state.edit_text(|buffer| buffer.insert_char(character)),
            _ => false,
        };
        if !edited && let Some(buffer) = state.text_mut() {
            match key.code {
                KeyCode::Left => buffer.move_left(),
                KeyCode::Right => buffer.move_right(),
                KeyCode::Home => buffer.move_home(),
                KeyCode::End => buffer.move_end(),
                _ => {}
            }
        }
        None
    }

    /// Inserts pasted text into the field; line breaks are dropped.
    pub fn handle_paste(&mut self, state: &mut EditorState, props: &EditorProps, text: &str) {
        if !props.connected || state.f_confirm.get() {
            return;
        }
        let single_line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        state.edit_text(|buffer| buffer.insert_str(&single_line));
    }

    /// Handles a pointer event; returns the value to commit.
    pub fn handle_mouse_events(&mut self, state: &mut EditorState, props: &EditorProps, mouse: MouseEvent) -> Option<EditorValue> {
        if !props.connected || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }

        let position = Position::new(mouse.column, mouse.row);
        match self.target_at(position)? {
            EditorTarget::Input => {
                if matches!(state.pending(), PendingValue::Toggle(_)) {
                    return state.flip().map(EditorValue::Bool);
                }
                let text_left = self.text_origin(props).x;
                let column = mouse.column.saturating_sub(text_left) as usize;
                if let Some(buffer) = state.text_mut() {
                    buffer.set_cursor_from_column(column);
                }
                None
            }
            EditorTarget::Confirm => self.submit(state, props),
        }
    }

    /// Which part of the last rendered editor contains `position`.
    pub fn target_at(&self, position: Position) -> Option<EditorTarget> {
        if self.layout.field_area.contains(position) {
            return Some(EditorTarget::Input);
        }
        if self.layout.confirm_area.contains(position) {
            return Some(EditorTarget::Confirm);
        }
        None
    }

    pub fn render_with_state(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &EditorState, props: &EditorProps) {
        let layout = self.get_preferred_layout(props, state, area);

        let label = props.label.unwrap_or_else(|| props.format.prompt());
        let label_style = if state.is_focused() {
            theme.accent_emphasis_style()
        } else {
            theme.text_secondary_style()
        };
        let label_row = Rect {
            y: layout.field_area.y + if props.compact { 0 } else { 1 },
            height: 1,
            ..layout.label_area
        };
        frame.render_widget(Paragraph::new(Span::styled(label.to_string(), label_style)), label_row);

        match state.pending() {
            PendingValue::Toggle(on) => {
                let inner = self.render_field_block(frame, &layout, theme, state, props);
                let toggle = Toggle::new(*on, theme).enabled(props.connected).focused(state.f_input.get());
                frame.render_widget(toggle, inner);
            }
            PendingValue::Text(_) => {
                self.render_text_field(frame, &layout, theme, state, props);
                th::render_button(
                    frame,
                    layout.confirm_area,
                    CONFIRM_LABEL,
                    theme,
                    ButtonRenderOptions::new(
                        props.connected,
                        state.f_confirm.get(),
                        if props.compact { Borders::NONE } else { Borders::ALL },
                    ),
                );
            }
        }

        self.render_message(frame, layout.message_area, theme, state, props);
        self.layout = layout;
    }

    pub fn get_hint_spans(&self, theme: &dyn Theme, state: &EditorState, props: &EditorProps) -> Vec<Span<'static>> {
        if !props.connected {
            return Vec::new();
        }
        match state.pending() {
            PendingValue::Toggle(_) => build_hint_spans(theme, &[("Space", " Toggle  ")]),
            PendingValue::Text(_) => build_hint_spans(theme, &[("Enter", " Set  "), ("Esc", " Clear  ")]),
        }
    }

    pub fn get_preferred_layout(&self, props: &EditorProps, state: &EditorState, area: Rect) -> EditorLayoutState {
        let label_width = MAX_LABEL_WIDTH.min(area.width / 3);
        let is_toggle = matches!(state.pending(), PendingValue::Toggle(_));
        let field_width = if is_toggle {
            Constraint::Length(if props.compact { TOGGLE_WIDTH } else { TOGGLE_WIDTH + 2 })
        } else {
            Constraint::Fill(2)
        };
        let confirm_width = if is_toggle { 0 } else { CONFIRM_WIDTH };

        if props.compact {
            let [label_area, field_area, _, confirm_area, _, message_area] = Layout::horizontal([
                Constraint::Length(label_width),
                field_width,
                Constraint::Length(1),
                Constraint::Length(confirm_width),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);
            return EditorLayoutState {
                label_area,
                field_area,
                confirm_area,
                message_area,
            };
        }

        let [row, message_row] = Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);
        let [label_area, field_area, confirm_area] =
            Layout::horizontal([Constraint::Length(label_width), field_width, Constraint::Length(confirm_width)]).areas(row);
        let message_area = Rect {
            x: field_area.x,
            width: message_row.width.saturating_sub(label_width),
            ..message_row
        };
        EditorLayoutState {
            label_area,
            field_area,
            confirm_area,
            message_area,
        }
    }

    fn submit(&mut self, state: &mut EditorState, props: &EditorProps) -> Option<EditorValue> {
        let value = state.confirm(props.format, props.committed)?;
        debug!(format = %props.format, value = %value, "Editor confirmed value");
        Some(value)
    }

    /// Top-left cell where typed text starts.
    fn text_origin(&self, props: &EditorProps) -> Position {
        let field = self.layout.field_area;
        if props.compact {
            Position::new(field.x, field.y)
        } else {
            Position::new(field.x + 1, field.y + 1)
        }
    }

    fn render_field_block(&self, frame: &mut Frame, layout: &EditorLayoutState, theme: &dyn Theme, state: &EditorState, props: &EditorProps) -> Rect {
        if props.compact {
            return layout.field_area;
        }
        let focused = props.connected && state.f_input.get();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if props.connected {
                theme.border_style(focused)
            } else {
                theme.text_muted_style()
            })
            .title(Span::styled(props.format.as_str(), theme.text_muted_style()));
        let inner = block.inner(layout.field_area);
        frame.render_widget(block, layout.field_area);
        inner
    }

    fn render_text_field(&self, frame: &mut Frame, layout: &EditorLayoutState, theme: &dyn Theme, state: &EditorState, props: &EditorProps) {
        let Some(buffer) = state.text() else { return };
        let inner = self.render_field_block(frame, layout, theme, state, props);
        let field_style = th::input_style(theme, state.error().is_none(), props.connected);

        let mut spans = Vec::with_capacity(2);
        if state.phase() == EditPhase::Idle {
            spans.push(Span::styled(placeholder_text(props.committed, props.units()), theme.text_muted_style()));
        } else {
            spans.push(Span::styled(buffer.input().to_string(), field_style));
            if let Some(units) = props.units() {
                spans.push(Span::styled(format!(" {units}"), theme.text_muted_style()));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(field_style), inner);

        if props.connected && state.f_input.get() && inner.width > 0 {
            let offset = (buffer.cursor_columns() as u16).min(inner.width - 1);
            frame.set_cursor_position((inner.x + offset, inner.y));
        }
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &EditorState, props: &EditorProps) {
        let line = if !props.connected {
            Span::styled("offline: editing disabled", theme.status_warning())
        } else if let Some(error) = state.error() {
            Span::styled(error.to_string(), theme.status_error())
        } else {
            return;
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knobs_types::ValueFormat;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn type_text(view: &mut ValueEditorView, state: &mut EditorState, props: &EditorProps, text: &str) {
        for character in text.chars() {
            assert_eq!(view.handle_key_events(state, props, key(KeyCode::Char(character))), None);
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn render(view: &mut ValueEditorView, state: &EditorState, props: &EditorProps, width: u16) -> Terminal<TestBackend> {
        let theme = crate::ui::theme::DraculaTheme::new();
        let height = ValueEditorView::preferred_height(props);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
        terminal
            .draw(|frame| view.render_with_state(frame, frame.area(), &theme, state, props))
            .expect("draw");
        terminal
    }

    fn row_text(terminal: &Terminal<TestBackend>, row: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width).map(|x| buffer[(x, row)].symbol().to_string()).collect()
    }

    #[test]
    fn numeric_formats_commit_parsed_number() {
        for format in [ValueFormat::Number, ValueFormat::NumberWithUnits] {
            let props = EditorProps::new(format, None);
            let mut state = EditorState::mount(format, None);
            let mut view = ValueEditorView::default();

            type_text(&mut view, &mut state, &props, "42");
            let committed = view.handle_key_events(&mut state, &props, key(KeyCode::Enter));
            assert_eq!(committed, Some(EditorValue::from(42u64)));
        }
    }

    #[test]
    fn non_numeric_text_is_rejected_inline() {
        let props = EditorProps::new(ValueFormat::Number, None);
        let mut state = EditorState::mount(ValueFormat::Number, None);
        let mut view = ValueEditorView::default();

        type_text(&mut view, &mut state, &props, "abc");
        assert_eq!(view.handle_key_events(&mut state, &props, key(KeyCode::Enter)), None);
        assert!(state.error().is_some());
        assert_eq!(state.text().map(|buffer| buffer.input()), Some("abc"));
    }

    #[test]
    fn every_toggle_commits_the_negation() {
        let props = EditorProps::new(ValueFormat::Bool, None);
        let mut state = EditorState::mount(ValueFormat::Bool, None);
        let mut view = ValueEditorView::default();

        let first = view.handle_key_events(&mut state, &props, key(KeyCode::Char(' ')));
        let second = view.handle_key_events(&mut state, &props, key(KeyCode::Enter));
        let ignored = view.handle_key_events(&mut state, &props, key(KeyCode::Char('x')));
        assert_eq!(first, Some(EditorValue::Bool(true)));
        assert_eq!(second, Some(EditorValue::Bool(false)));
        assert_eq!(ignored, None);
    }

    #[test]
    fn string_format_commits_verbatim() {
        let props = EditorProps::new(ValueFormat::String, None);
        let mut state = EditorState::mount(ValueFormat::String, None);
        let mut view = ValueEditorView::default();

        type_text(&mut view, &mut state, &props, "hello");
        assert_eq!(
            view.handle_key_events(&mut state, &props, key(KeyCode::Enter)),
            Some(EditorValue::from("hello"))
        );
    }

    #[test]
    fn untouched_field_resends_committed_value() {
        let committed = EditorValue::from("bench-01");
        let props = EditorProps::new(ValueFormat::String, Some(&committed));
        let mut state = EditorState::mount(ValueFormat::String, Some(&committed));
        let mut view = ValueEditorView::default();

        view.handle_key_events(&mut state, &props, key(KeyCode::Right));
        assert_eq!(view.handle_key_events(&mut state, &props, key(KeyCode::Enter)), Some(committed.clone()));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn string_field_cleared_by_user_commits_empty_string() {
        let committed = EditorValue::from("bench-01");
        let props = EditorProps::new(ValueFormat::String, Some(&committed));
        let mut state = EditorState::mount(ValueFormat::String, Some(&committed));
        let mut view = ValueEditorView::default();

        type_text(&mut view, &mut state, &props, "a");
        view.handle_key_events(&mut state, &props, key(KeyCode::Backspace));
        assert_eq!(view.handle_key_events(&mut state, &props, key(KeyCode::Enter)), Some(EditorValue::from("")));

        let terminal = render(&mut view, &state, &props, 60);
        assert!(!row_text(&terminal, 1).contains("(current)"));
    }

    #[test]
    fn disconnected_editor_ignores_all_interaction() {
        for format in [ValueFormat::Bool, ValueFormat::Number] {
            let mut props = EditorProps::new(format, None);
            let mut state = EditorState::mount(format, None);
            let mut view = ValueEditorView::default();
            if format == ValueFormat::Number {
                type_text(&mut view, &mut state, &props, "7");
            }
            render(&mut view, &state, &props, 60);
            props.connected = false;
            let before = state.pending().clone();

            for code in [KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('9'), KeyCode::Esc] {
                assert_eq!(view.handle_key_events(&mut state, &props, key(code)), None);
            }
            let field = view.layout.field_area;
            let confirm = view.layout.confirm_area;
            assert_eq!(view.handle_mouse_events(&mut state, &props, click(field.x + 1, field.y + 1)), None);
            assert_eq!(view.handle_mouse_events(&mut state, &props, click(confirm.x + 1, confirm.y + 1)), None);
            view.handle_paste(&mut state, &props, "123");
            assert_eq!(state.pending(), &before);
        }
    }

    #[test]
    fn repeated_confirmations_are_not_deduplicated() {
        let props = EditorProps::new(ValueFormat::String, None);
        let mut state = EditorState::mount(ValueFormat::String, None);
        let mut view = ValueEditorView::default();

        type_text(&mut view, &mut state, &props, "same");
        let commits: Vec<_> = (0..3)
            .filter_map(|_| view.handle_key_events(&mut state, &props, key(KeyCode::Enter)))
            .collect();
        assert_eq!(commits, vec![EditorValue::from("same"); 3]);
    }

    #[test]
    fn escape_clears_pending_text() {
        let props = EditorProps::new(ValueFormat::Json, None);
        let mut state = EditorState::mount(ValueFormat::Json, None);
        let mut view = ValueEditorView::default();

        type_text(&mut view, &mut state, &props, "[1");
        view.handle_key_events(&mut state, &props, key(KeyCode::Esc));
        assert_eq!(state.text().map(|buffer| buffer.input()), Some(""));
        assert_eq!(
            view.handle_key_events(&mut state, &props, key(KeyCode::Enter)),
            None,
            "empty buffer never commits"
        );
        assert_eq!(state.error(), Some("nothing to commit"));
    }

    #[test]
    fn focused_confirm_button_ignores_typing() {
        let props = EditorProps::new(ValueFormat::Number, None);
        let mut state = EditorState::mount(ValueFormat::Number, None);
        let mut view = ValueEditorView::default();

        type_text(&mut view, &mut state, &props, "5");
        state.f_confirm.set(true);
        view.handle_key_events(&mut state, &props, key(KeyCode::Char('6')));
        assert_eq!(
            view.handle_key_events(&mut state, &props, key(KeyCode::Enter)),
            Some(EditorValue::from(5u64))
        );
    }

    #[test]
    fn placeholder_tracks_latest_committed_value() {
        let mut view = ValueEditorView::default();
        let state = EditorState::mount(ValueFormat::NumberWithUnits, None);

        let first = EditorValue::from(44100u64);
        let mut props = EditorProps::new(ValueFormat::NumberWithUnits, Some(&first));
        props.units = Some("Hz");
        props.label = Some("Rate");
        let terminal = render(&mut view, &state, &props, 60);
        assert!(row_text(&terminal, 1).contains("44100 Hz (current)"));

        let second = EditorValue::from(48000u64);
        props.committed = Some(&second);
        let terminal = render(&mut view, &state, &props, 60);
        let row = row_text(&terminal, 1);
        assert!(row.contains("48000 Hz (current)"));
        assert!(row.contains("Rate"));
    }

    #[test]
    fn placeholder_is_hidden_while_editing() {
        let committed = EditorValue::from("old");
        let props = EditorProps::new(ValueFormat::String, Some(&committed));
        let mut state = EditorState::mount(ValueFormat::String, Some(&committed));
        let mut view = ValueEditorView::default();

        type_text(&mut view, &mut state, &props, "new");
        let terminal = render(&mut view, &state, &props, 60);
        let row = row_text(&terminal, 1);
        assert!(row.contains("new"));
        assert!(!row.contains("(current)"));
    }

    #[test]
    fn clicking_the_button_commits_and_clicking_the_switch_toggles() {
        let props = EditorProps::new(ValueFormat::Number, None);
        let mut state = EditorState::mount(ValueFormat::Number, None);
        let mut view = ValueEditorView::default();
        type_text(&mut view, &mut state, &props, "9");
        render(&mut view, &state, &props, 60);
        let confirm = view.layout.confirm_area;
        assert_eq!(
            view.handle_mouse_events(&mut state, &props, click(confirm.x + 2, confirm.y + 1)),
            Some(EditorValue::from(9u64))
        );

        let props = EditorProps::new(ValueFormat::Bool, None);
        let mut state = EditorState::mount(ValueFormat::Bool, None);
        let mut view = ValueEditorView::default();
        render(&mut view, &state, &props, 60);
        let field = view.layout.field_area;
        assert_eq!(
            view.handle_mouse_events(&mut state, &props, click(field.x + 1, field.y + 1)),
            Some(EditorValue::Bool(true))
        );
    }

    #[test]
    fn compact_rendering_is_one_line() {
        let committed = EditorValue::from(3u64);
        let mut props = EditorProps::new(ValueFormat::Number, Some(&committed));
        props.compact = true;
        let state = EditorState::mount(ValueFormat::Number, Some(&committed));
        let mut view = ValueEditorView::default();

        let terminal = render(&mut view, &state, &props, 60);
        let row = row_text(&terminal, 0);
        assert!(row.contains("3 (current)"));
        assert!(row.contains("Set"));
        assert_eq!(view.layout.field_area.height, 1);
    }

    #[test]
    fn disconnected_render_explains_why() {
        let mut props = EditorProps::new(ValueFormat::String, None);
        props.connected = false;
        let state = EditorState::mount(ValueFormat::String, None);
        let mut view = ValueEditorView::default();

        let terminal = render(&mut view, &state, &props, 60);
        assert!(row_text(&terminal, 3).contains("offline: editing disabled"));
    }
}
