//! Component system for the Knobs TUI.
//!
//! Components are self-contained UI elements: they handle their own input,
//! render into a provided `Rect`, and report side effects back to the
//! application as [`Effect`]s instead of mutating shared state directly.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::{App, Effect, Msg};

/// A UI component with its own behavior.
///
/// # Component Lifecycle
///
/// 1. **Event Handling**: input arrives through `handle_key_events()`,
///    `handle_mouse_events()` and `handle_message()`
/// 2. **Rendering**: `render()` draws the component into the provided frame area
///
/// # Example Implementation
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Banner;
///
/// impl Component for Banner {
///     fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
///         frame.render_widget(Paragraph::new("knobs"), rect);
///     }
/// }
/// ```
pub(crate) trait Component {
    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events while this component is active.
    ///
    /// Components should only act on keys meaningful to them and report any
    /// outward consequence as effects.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events inside the component.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should only draw and record layout for hit-testing;
    /// state changes belong in the event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints for the hint bar.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }

    /// Split `area` into the rectangles this component draws into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}
