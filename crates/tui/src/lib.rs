//! # Knobs TUI Library
//!
//! Terminal panel for editing device parameters. Each parameter is edited by
//! a value editor that understands the parameter's format: a switch for
//! booleans, and a validated text field with a confirm button for numbers,
//! strings and JSON. Confirmed values are reported as commits and become the
//! parameter's new committed value.
//!
//! ## Architecture
//!
//! The TUI follows a component-based architecture. Components handle input
//! and render themselves, returning effects that the application state applies.

mod app;
mod ui;

use anyhow::Result;
use knobs_util::KnobsConfig;
use tracing::debug;

/// Options supplied by the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Theme id or alias; overrides the sheet's preference.
    pub theme: Option<String>,
    /// Start with the link down.
    pub offline: bool,
}

/// Runs the main TUI application loop.
///
/// Sets up the terminal, shows every parameter in `config`, and processes
/// input until the user quits.
///
/// # Errors
///
/// Returns an error when the terminal cannot be set up or restored, or when
/// reading terminal input fails.
pub async fn run(config: KnobsConfig, options: RunOptions) -> Result<()> {
    let preferred_theme = options.theme.as_deref().or(config.theme.as_deref());
    let theme = ui::theme::load(preferred_theme);
    debug!(theme = theme.definition.id, source = ?config.source, "Starting knobs panel");

    let connected = config.connected && !options.offline;
    let app = app::App::new(&config, theme, connected);
    ui::runtime::run_app(app).await
}
