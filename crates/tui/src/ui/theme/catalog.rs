use super::{Ansi256Theme, DraculaTheme, NordTheme, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier used in sheets and `TUI_THEME`.
    pub id: &'static str,
    pub label: &'static str,
    /// Alternative spellings that resolve to this definition.
    pub aliases: &'static [&'static str],
    /// Whether the palette targets ANSI/8-bit terminals.
    pub is_ansi_fallback: bool,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        id: "dracula",
        label: "Dracula",
        aliases: &["dracula", "default"],
        is_ansi_fallback: false,
        factory: || Box::new(DraculaTheme::new()),
    },
    ThemeDefinition {
        id: "nord",
        label: "Nord",
        aliases: &["nord", "polar"],
        is_ansi_fallback: false,
        factory: || Box::new(NordTheme::new()),
    },
    ThemeDefinition {
        id: "ansi256",
        label: "ANSI 256",
        aliases: &["ansi256", "ansi", "256"],
        is_ansi_fallback: true,
        factory: || Box::new(Ansi256Theme::new()),
    },
];

/// Locate a definition by id or alias (case-insensitive).
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    THEME_DEFINITIONS.iter().find(|definition| {
        definition.id.eq_ignore_ascii_case(name) || definition.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    })
}

/// Preferred default for truecolor terminals.
pub fn default_truecolor() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[0]
}

/// Preferred default for ANSI-only terminals.
pub fn default_ansi() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_ids_and_aliases_case_insensitively() {
        assert_eq!(resolve("NORD").map(|definition| definition.id), Some("nord"));
        assert_eq!(resolve("polar").map(|definition| definition.id), Some("nord"));
        assert_eq!(resolve("256").map(|definition| definition.id), Some("ansi256"));
        assert!(resolve("solarized").is_none());
    }

    #[test]
    fn defaults_point_at_expected_palettes() {
        assert_eq!(default_truecolor().id, "dracula");
        assert!(default_ansi().is_ansi_fallback);
    }
}
