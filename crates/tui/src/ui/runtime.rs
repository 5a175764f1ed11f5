//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (raw mode, alternate screen, mouse capture,
//!   bracketed paste), restoring it on every exit path.
//! - Select over terminal input and Ctrl+C.
//! - Route input to the main view and apply the returned `Effect`s.
//! - Rebuild the focus tree and redraw after each handled event.

use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, EventStream,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, prelude::CrosstermBackend};
use tokio::signal;
use tracing::{debug, warn};

use crate::app::{App, Effect, Msg};
use crate::ui::main_component::MainView;

type TerminalBackend = Terminal<CrosstermBackend<Stdout>>;

/// Put the terminal into raw mode and enter the alternate screen.
///
/// Raw mode is switched back off when any later step fails.
fn setup_terminal() -> Result<TerminalBackend> {
    enable_raw_mode().context("failed to enable raw mode")?;
    undo_on_error(enter_alternate_screen, || {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste);
        if let Err(error) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", error);
        }
    })
}

fn enter_alternate_screen() -> Result<TerminalBackend> {
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Runs `step`, calling `undo` only if it fails.
fn undo_on_error<T>(step: impl FnOnce() -> Result<T>, undo: impl FnOnce()) -> Result<T> {
    let result = step();
    if result.is_err() {
        undo();
    }
    result
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut TerminalBackend) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut TerminalBackend, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    app.rebuild_focus();
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Translate a terminal event into effects.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.is_press() => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Paste(text) => main_view.handle_message(app, Msg::Paste(text)),
        // Resizes only need the redraw that follows every event.
        Event::Resize(..) | Event::Key(_) | Event::FocusGained | Event::FocusLost => Vec::new(),
    }
}

async fn event_loop(terminal: &mut TerminalBackend, app: &mut App, main_view: &mut MainView) -> Result<()> {
    let mut events = EventStream::new();
    render(terminal, app, main_view)?;

    while !app.should_quit() {
        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    debug!("Terminal event stream closed");
                    break;
                };
                let event = event.context("failed to read terminal event")?;
                let effects = handle_input_event(app, main_view, event);
                app.apply_effects(effects);
            }
            _ = signal::ctrl_c() => break,
        }
        render(terminal, app, main_view)?;
    }
    Ok(())
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event loop,
/// and restores the terminal even when the loop fails.
pub async fn run_app(mut app: App) -> Result<()> {
    let mut main_view = MainView::new();
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut app, &mut main_view).await;
    if let Err(error) = cleanup_terminal(&mut terminal) {
        warn!("Failed to restore terminal: {}", error);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn failed_setup_step_is_undone() {
        let undone = Cell::new(false);
        let result: Result<()> = undo_on_error(|| Err(anyhow::anyhow!("no tty")), || undone.set(true));
        assert!(result.is_err());
        assert!(undone.get());
    }

    #[test]
    fn successful_setup_step_is_kept() {
        let undone = Cell::new(false);
        let result = undo_on_error(|| Ok(7), || undone.set(true));
        assert_eq!(result.ok(), Some(7));
        assert!(!undone.get());
    }
}
