//! Application state for the Knobs TUI.
//!
//! `App` owns everything the components read and mutate: the theme, the
//! parameter panel, the link flag, the focus tree and the commit history.
//! Components never apply side effects themselves; they return [`Effect`]s
//! which [`App::apply_effects`] executes.

use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, Local};
use knobs_types::EditorValue;
use knobs_util::{ConfigSource, KnobsConfig};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::ui::components::parameter_panel::ParameterPanelState;
use crate::ui::theme::{LoadedTheme, Theme};

/// Number of commits kept for the status line.
pub const HISTORY_LIMIT: usize = 50;

/// Side effects requested by components.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// An editor confirmed `value` for parameter `key`.
    Commit { key: String, value: EditorValue },
    ToggleLink,
    Quit,
}

/// Application-level messages routed to components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Bracketed paste from the terminal.
    Paste(String),
}

/// Cross-cutting shared context owned by the App.
#[derive(Debug)]
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    /// Catalog id of the active theme.
    pub theme_id: &'static str,
    pub config_source: ConfigSource,
}

impl SharedCtx {
    pub fn new(theme: LoadedTheme, config_source: ConfigSource) -> Self {
        Self {
            theme: theme.theme,
            theme_id: theme.definition.id,
            config_source,
        }
    }
}

/// One applied commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub key: String,
    pub value: EditorValue,
    pub at: DateTime<Local>,
}

pub struct App {
    pub ctx: SharedCtx,
    pub parameters: ParameterPanelState,
    /// Whether edits can reach the device.
    pub connected: bool,
    pub focus: Rc<Focus>,
    history: VecDeque<CommitRecord>,
    should_quit: bool,
    container: FocusFlag,
}

impl App {
    pub fn new(config: &KnobsConfig, theme: LoadedTheme, connected: bool) -> Self {
        let mut app = Self {
            ctx: SharedCtx::new(theme, config.source.clone()),
            parameters: ParameterPanelState::new(config.parameters.values()),
            connected,
            focus: Rc::default(),
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            should_quit: false,
            container: FocusFlag::default(),
        };
        app.rebuild_focus();
        app
    }

    /// Rebuilds the focus tree so structure changes are reflected.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = Rc::new(FocusBuilder::rebuild_for(self, Some(Rc::unwrap_or_clone(old_focus))));
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Most recent commit first.
    pub fn history(&self) -> impl Iterator<Item = &CommitRecord> {
        self.history.iter().rev()
    }

    pub fn last_commit(&self) -> Option<&CommitRecord> {
        self.history.back()
    }

    pub fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Commit { key, value } => self.apply_commit(key, value),
                Effect::ToggleLink => {
                    self.connected = !self.connected;
                    info!(connected = self.connected, "Link state changed");
                }
                Effect::Quit => self.should_quit = true,
            }
        }
    }

    fn apply_commit(&mut self, key: String, value: EditorValue) {
        if !self.parameters.apply_commit(&key, value.clone()) {
            warn!(key = %key, "Dropping commit for unknown parameter");
            return;
        }
        info!(key = %key, value = %value, "Committed parameter value");
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(CommitRecord {
            key,
            value,
            at: Local::now(),
        });
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.widget(&self.parameters);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
