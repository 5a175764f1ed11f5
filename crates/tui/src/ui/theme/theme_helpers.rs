use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for input fields; caller sets the block border based on focus.
pub fn input_style<T: Theme + ?Sized>(theme: &T, valid: bool, enabled: bool) -> Style {
    let ThemeRoles {
        surface,
        text,
        text_muted,
        error,
        ..
    } = *theme.roles();
    let mut style = Style::default().bg(surface).fg(text);
    if !enabled {
        style = style.fg(text_muted);
    } else if !valid {
        style = style.fg(error);
    }
    style
}

/// Flags describing how a button should be drawn.
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub borders: Borders,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, borders: Borders) -> Self {
        Self { enabled, focused, borders }
    }
}

/// Primary button style (filled accent background).
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, focused: bool) -> Style {
    if !enabled {
        let ThemeRoles {
            surface_muted, text_muted, ..
        } = *theme.roles();
        return Style::default().bg(surface_muted).fg(text_muted);
    }
    let ThemeRoles {
        accent_primary,
        background,
        focus,
        ..
    } = *theme.roles();
    let fill = if focused { focus } else { accent_primary };
    Style::default().bg(fill).fg(background).add_modifier(Modifier::BOLD)
}

/// Renders a filled button.
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let border_style = if options.enabled {
        theme.border_style(options.focused)
    } else {
        theme.text_muted_style()
    };

    let button_style = button_primary_style(theme, options.enabled, options.focused);

    let padding = if options.borders.is_empty() || area.height < 3 {
        Padding::horizontal(1)
    } else {
        Padding::ZERO
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(
                Block::default()
                    .borders(options.borders)
                    .border_style(border_style)
                    .padding(padding),
            )
            .style(button_style),
        area,
    );
}

/// Small filled label, e.g. the link badge in the header.
pub fn badge_style<T: Theme + ?Sized>(theme: &T, healthy: bool) -> Style {
    let ThemeRoles {
        success,
        error,
        background,
        ..
    } = *theme.roles();
    Style::default()
        .bg(if healthy { success } else { error })
        .fg(background)
        .add_modifier(Modifier::BOLD)
}

/// Build hint-bar spans from `(key, description)` pairs.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    hints
        .iter()
        .flat_map(|(key, description)| {
            [
                Span::styled(*key, theme.accent_emphasis_style()),
                Span::styled(*description, theme.text_muted_style()),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;

    #[test]
    fn hint_spans_alternate_keys_and_descriptions() {
        let theme = DraculaTheme::new();
        let spans = build_hint_spans(&theme, &[("Enter", " Set  "), ("Esc", " Clear")]);
        let text: Vec<&str> = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, ["Enter", " Set  ", "Esc", " Clear"]);
        assert_eq!(spans[0].style, theme.accent_emphasis_style());
    }

    #[test]
    fn focused_button_fills_with_focus_color() {
        let theme = DraculaTheme::new();
        assert_eq!(button_primary_style(&theme, true, true).bg, Some(theme.roles().focus));
        assert_eq!(button_primary_style(&theme, true, false).bg, Some(theme.roles().accent_primary));
        assert_eq!(button_primary_style(&theme, false, true).bg, Some(theme.roles().surface_muted));
    }

    #[test]
    fn disabled_input_uses_muted_text_even_when_invalid() {
        let theme = DraculaTheme::new();
        assert_eq!(input_style(&theme, false, false).fg, Some(theme.roles().text_muted));
        assert_eq!(input_style(&theme, false, true).fg, Some(theme.roles().error));
    }
}
