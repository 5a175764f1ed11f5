use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use knobs_util::ConfigSource;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::components::{Component, ParameterPanelComponent};
use super::theme::theme_helpers as th;
use crate::app::{App, Effect, Msg};

/// Root view: header, parameter panel, status line and hint bar.
#[derive(Debug, Default)]
pub struct MainView {
    pub panel: ParameterPanelComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focuses the parameter list when nothing else holds focus.
    pub fn restore_focus(&self, app: &mut App) {
        app.focus.focus(&app.parameters.f_list);
    }

    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => return vec![Effect::Quit],
                KeyCode::Char('l') => return vec![Effect::ToggleLink],
                _ => {}
            }
        }
        self.panel.handle_key_events(app, key)
    }

    pub fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        self.panel.handle_mouse_events(app, mouse)
    }

    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        self.panel.handle_message(app, msg)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let [header, body, status, hints] = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(6),    // Panel
            Constraint::Length(1), // Latest commit
            Constraint::Length(1), // Hint bar
        ])
        .areas(area);

        frame.render_widget(Paragraph::new("").style(th::panel_style(&*app.ctx.theme)), area);
        self.render_header(frame, header, app);
        self.panel.render(frame, body, app);
        self.render_status(frame, status, app);
        self.render_hints(frame, hints, app);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let source = match &app.ctx.config_source {
            ConfigSource::File(path) => path.display().to_string(),
            ConfigSource::BuiltIn => "demo sheet".to_string(),
        };
        let badge = if app.connected { " online " } else { " offline " };
        let badge_width = badge.len() as u16;
        let [title_area, badge_area] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(badge_width)]).areas(area);

        let title = Line::from(vec![
            Span::styled("knobs", theme.accent_emphasis_style()),
            Span::styled(format!("  {source}"), theme.text_muted_style()),
            Span::styled(format!("  theme: {}", app.ctx.theme_id), theme.text_muted_style()),
        ]);
        frame.render_widget(Paragraph::new(title), title_area);
        frame.render_widget(Paragraph::new(Span::styled(badge, th::badge_style(theme, app.connected))), badge_area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let line = match app.last_commit() {
            Some(record) => Line::from(vec![
                Span::styled(record.at.format("%H:%M:%S").to_string(), theme.text_muted_style()),
                Span::styled(format!("  {} = ", record.key), theme.text_secondary_style()),
                Span::styled(record.value.to_string(), theme.status_success()),
                Span::styled(format!("  ({} in history)", app.history().count()), theme.text_muted_style()),
            ]),
            None => Line::from(Span::styled("No commits yet", theme.text_muted_style())),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let mut spans = self.panel.get_hint_spans(app);
        spans.extend(th::build_hint_spans(theme, &[("Ctrl+L", " Link  "), ("Ctrl+Q", " Quit")]));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::demo_app;
    use knobs_types::EditorValue;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(view: &mut MainView, app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("test terminal");
        terminal.draw(|frame| view.render(frame, frame.area(), app)).expect("draw");
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn control_keys_map_to_app_effects() {
        let mut app = demo_app();
        let mut view = MainView::new();
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);

        assert_eq!(view.handle_key_events(&mut app, ctrl('q')), vec![Effect::Quit]);
        assert_eq!(view.handle_key_events(&mut app, ctrl('c')), vec![Effect::Quit]);
        assert_eq!(view.handle_key_events(&mut app, ctrl('l')), vec![Effect::ToggleLink]);
    }

    #[test]
    fn header_badge_follows_link_state() {
        let mut app = demo_app();
        let mut view = MainView::new();
        assert!(screen(&mut view, &mut app).contains(" online "));

        app.apply_effects(vec![Effect::ToggleLink]);
        let rendered = screen(&mut view, &mut app);
        assert!(rendered.contains(" offline "));
        assert!(rendered.contains("demo sheet"));
    }

    #[test]
    fn status_line_shows_latest_commit() {
        let mut app = demo_app();
        let mut view = MainView::new();
        assert!(screen(&mut view, &mut app).contains("No commits yet"));

        app.apply_effects(vec![Effect::Commit {
            key: "device_name".into(),
            value: EditorValue::from("bench-02"),
        }]);
        assert!(screen(&mut view, &mut app).contains("device_name = bench-02"));
    }
}
