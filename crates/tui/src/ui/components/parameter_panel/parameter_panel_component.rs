use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use knobs_types::EditorValue;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Effect, Msg};
use crate::ui::components::Component;
use crate::ui::components::parameter_panel::state::ParameterEntry;
use crate::ui::components::value_editor::{EditorTarget, ValueEditorView};
use crate::ui::theme::{Theme, theme_helpers as th};

#[derive(Debug, Default)]
pub struct ParameterPanelLayout {
    pub list_area: Rect,
    pub details_area: Rect,
    pub editor_area: Rect,
}

impl From<Vec<Rect>> for ParameterPanelLayout {
    fn from(rects: Vec<Rect>) -> Self {
        Self {
            list_area: rects[0],
            details_area: rects[1],
            editor_area: rects[2],
        }
    }
}

/// Lists the parameters and hosts the editor for the selected one.
#[derive(Debug, Default)]
pub struct ParameterPanelComponent {
    editor: ValueEditorView,
    layout: ParameterPanelLayout,
}

impl ParameterPanelComponent {
    /// Selects a row and moves focus to its editor's primary control.
    fn select(&mut self, app: &mut App, index: usize) {
        app.parameters.set_selected_index(Some(index));
        app.rebuild_focus();
        if let Some(entry) = app.parameters.selected() {
            app.focus.focus(&entry.editor.f_input);
        }
    }

    fn commit_effect(key: &str, value: Option<EditorValue>) -> Vec<Effect> {
        value
            .map(|value| Effect::Commit {
                key: key.to_string(),
                value,
            })
            .into_iter()
            .collect()
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let focused = app.parameters.f_list.get();
        let list_block = th::block(theme, Some("Parameters"), focused);
        let inner_width = list_block.inner(area).width as usize;
        let mouse_over = app.parameters.mouse_over_index();

        let items: Vec<ListItem> = app
            .parameters
            .entries()
            .enumerate()
            .map(|(index, entry)| {
                let item = Self::build_list_item(entry, inner_width, theme);
                if mouse_over == Some(index) {
                    item.style(theme.selection_style().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let highlight = if focused {
            theme.selection_style().add_modifier(Modifier::BOLD)
        } else {
            theme.selection_style()
        };
        let list = List::new(items).block(list_block).highlight_style(highlight).highlight_symbol("> ");
        frame.render_stateful_widget(list, area, app.parameters.list_state_mut());
    }

    fn build_list_item(entry: &ParameterEntry, inner_width: usize, theme: &dyn Theme) -> ListItem<'static> {
        let value = entry.display_value();
        // 2 columns for the highlight symbol
        let padding = inner_width.saturating_sub(entry.label.width() + value.width() + 2);
        let value_style = if entry.committed.is_some() {
            theme.text_secondary_style()
        } else {
            theme.text_muted_style()
        };
        ListItem::new(Line::from(vec![
            Span::styled(entry.label.clone(), theme.text_primary_style()),
            Span::raw(" ".repeat(padding)),
            Span::styled(value, value_style),
        ]))
    }

    fn render_details(&mut self, frame: &mut Frame, layout: &ParameterPanelLayout, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Edit"), app.parameters.is_editor_focused());
        frame.render_widget(block, layout.details_area);

        let connected = app.connected;
        let Some(entry) = app.parameters.selected() else {
            frame.render_widget(Paragraph::new(Span::styled("No parameters configured", theme.text_muted_style())), layout.editor_area);
            return;
        };

        let [summary_area, _, editor_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(layout.editor_area);
        let summary = Line::from(vec![
            Span::styled(entry.key.clone(), theme.accent_emphasis_style()),
            Span::styled(format!("  {}", entry.format), theme.text_muted_style()),
        ]);
        frame.render_widget(Paragraph::new(summary), summary_area);

        let props = entry.props(connected);
        let editor_area = Rect {
            height: ValueEditorView::preferred_height(&props).min(editor_area.height),
            ..editor_area
        };
        self.editor.render_with_state(frame, editor_area, theme, &entry.editor, &props);
    }

    fn handle_list_click(&mut self, app: &mut App, position: Position) {
        // Skip the top border.
        let row = position.y.saturating_sub(self.layout.list_area.y + 1) as usize;
        let index = row + app.parameters.offset();
        if index < app.parameters.len() {
            self.select(app, index);
        } else {
            app.focus.focus(&app.parameters.f_list);
        }
    }
}

impl Component for ParameterPanelComponent {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let Msg::Paste(text) = msg;
        let connected = app.connected;
        if let Some(entry) = app.parameters.selected_mut()
            && entry.editor.f_input.get()
        {
            let (props, state) = entry.split(connected);
            self.editor.handle_paste(state, &props, &text);
        }
        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            KeyCode::Up => {
                if let Some(index) = app.parameters.selected_index() {
                    self.select(app, index.saturating_sub(1));
                }
                return Vec::new();
            }
            KeyCode::Down => {
                if let Some(index) = app.parameters.selected_index() {
                    self.select(app, index + 1);
                }
                return Vec::new();
            }
            KeyCode::Enter | KeyCode::Char(' ') if app.parameters.f_list.get() => {
                if let Some(entry) = app.parameters.selected() {
                    app.focus.focus(&entry.editor.f_input);
                }
                return Vec::new();
            }
            _ => {}
        }

        let connected = app.connected;
        let Some(entry) = app.parameters.selected_mut() else {
            return Vec::new();
        };
        if !entry.editor.is_focused() {
            return Vec::new();
        }
        let (props, state) = entry.split(connected);
        let committed = self.editor.handle_key_events(state, &props, key);
        let key_name = entry.key.clone();
        Self::commit_effect(&key_name, committed)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        let over_list = self.layout.list_area.contains(position);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if over_list => {
                self.handle_list_click(app, position);
                Vec::new()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(target) = self.editor.target_at(position) else {
                    return Vec::new();
                };
                let connected = app.connected;
                let Some(entry) = app.parameters.selected_mut() else {
                    return Vec::new();
                };
                let flag = match target {
                    EditorTarget::Input => &entry.editor.f_input,
                    EditorTarget::Confirm => &entry.editor.f_confirm,
                };
                app.focus.focus(flag);
                let (props, state) = entry.split(connected);
                let committed = self.editor.handle_mouse_events(state, &props, mouse);
                let key_name = entry.key.clone();
                Self::commit_effect(&key_name, committed)
            }
            MouseEventKind::Moved => {
                let index = over_list.then(|| {
                    position.y.saturating_sub(self.layout.list_area.y + 1) as usize + app.parameters.offset()
                });
                app.parameters.set_mouse_over_index(index);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let layout = ParameterPanelLayout::from(self.get_preferred_layout(app, rect));
        self.render_list(frame, layout.list_area, app);
        self.render_details(frame, &layout, app);
        self.layout = layout;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.ctx.theme;
        let mut spans = th::build_hint_spans(theme, &[("↑/↓", " Select  "), ("Tab", " Focus  ")]);
        if let Some(entry) = app.parameters.selected()
            && entry.editor.is_focused()
        {
            spans.extend(self.editor.get_hint_spans(theme, &entry.editor, &entry.props(app.connected)));
        }
        spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let [list_area, details_area] = Layout::horizontal([
            Constraint::Fill(2), // Parameter list
            Constraint::Fill(3), // Editor pane
        ])
        .areas(area);

        let editor_area = Rect {
            x: details_area.x + 2,
            y: details_area.y + 1,
            width: details_area.width.saturating_sub(4),
            height: details_area.height.saturating_sub(2),
        };

        vec![list_area, details_area, editor_area]
    }
}
