//! Theme styling for the panel.
//!
//! Defines the Dracula and Nord palettes, an ANSI 256-color fallback, the
//! semantic role set, and helper builders for ratatui widgets. Prefer these
//! helpers over hard-coded colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod catalog;
pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use catalog::ThemeDefinition;
pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Theme plus the definition that produced it.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme from `TUI_THEME`, the sheet's preference, and terminal capability.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    if matches!(detect_color_capability(), ColorCapability::Ansi256) {
        debug!("ANSI-only terminal detected; ignoring theme overrides and forcing fallback palette.");
        return LoadedTheme::from_definition(catalog::default_ansi());
    }

    if let Ok(theme_name) = env::var("TUI_THEME")
        && let Some(definition) = catalog::resolve(theme_name.trim())
    {
        return LoadedTheme::from_definition(definition);
    }

    if let Some(name) = preferred_theme {
        match catalog::resolve(name.trim()) {
            Some(definition) => return LoadedTheme::from_definition(definition),
            None => debug!(theme = name, "Unknown theme requested; using the default palette."),
        }
    }

    LoadedTheme::from_definition(catalog::default_truecolor())
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    if env::var("TUI_FORCE_TRUECOLOR")
        .ok()
        .map(|value| is_truthy(value.trim()))
        .unwrap_or(false)
    {
        return ColorCapability::Truecolor;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_aliases() {
        assert_eq!(parse_color_mode("24BIT"), Some(ColorCapability::Truecolor));
        assert_eq!(parse_color_mode("8bit"), Some(ColorCapability::Ansi256));
        assert_eq!(parse_color_mode("mono"), None);
    }

    #[test]
    fn preferred_theme_applies_on_truecolor_terminals() {
        temp_env::with_vars(
            [("TUI_COLOR_MODE", Some("truecolor")), ("TUI_THEME", None::<&str>)],
            || {
                assert_eq!(load(Some("nord")).definition.id, "nord");
                assert_eq!(load(Some("unknown")).definition.id, "dracula");
            },
        );
    }

    #[test]
    fn ansi_terminals_always_get_the_fallback() {
        temp_env::with_vars([("TUI_COLOR_MODE", Some("256")), ("TUI_THEME", Some("nord"))], || {
            assert_eq!(load(Some("nord")).definition.id, "ansi256");
        });
    }
}
