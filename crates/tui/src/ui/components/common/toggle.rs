//! Two-state switch drawn as a pair of segments, `ON` and `OFF`.
//!
//! The switch owns no state: callers pass the current value in and decide
//! what a toggle event means via [`is_toggle_key`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::ui::theme::Theme;

const ON_LABEL: &str = " ON ";
const OFF_LABEL: &str = " OFF ";

/// Width of the switch in terminal columns.
pub const TOGGLE_WIDTH: u16 = (ON_LABEL.len() + OFF_LABEL.len()) as u16;

pub struct Toggle<'a> {
    on: bool,
    enabled: bool,
    focused: bool,
    theme: &'a dyn Theme,
}

impl<'a> Toggle<'a> {
    pub fn new(on: bool, theme: &'a dyn Theme) -> Self {
        Self {
            on,
            enabled: true,
            focused: false,
            theme,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn segment_styles(&self) -> (Style, Style) {
        let roles = self.theme.roles();
        let idle = Style::default().bg(roles.surface_muted).fg(roles.text_muted);
        if !self.enabled {
            return (idle, idle);
        }
        let mut active = Style::default().bg(if self.on { roles.success } else { roles.accent_secondary }).fg(roles.background);
        if self.focused {
            active = active.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if self.on { (active, idle) } else { (idle, active) }
    }
}

impl Widget for Toggle<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (on_style, off_style) = self.segment_styles();
        let line = Line::from(vec![Span::styled(ON_LABEL, on_style), Span::styled(OFF_LABEL, off_style)]);
        Paragraph::new(line).render(area, buf);
    }
}

/// Keys that flip a focused switch.
pub fn is_toggle_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
