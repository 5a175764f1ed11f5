use indexmap::IndexMap;
use knobs_types::{EditorValue, ValueFormat};
use knobs_util::ParameterSpec;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};

use crate::ui::components::value_editor::{EditorProps, EditorState};

/// One row of the panel: a parameter, its committed value and its editor.
#[derive(Debug, Clone)]
pub struct ParameterEntry {
    pub key: String,
    pub label: String,
    pub format: ValueFormat,
    pub units: Option<String>,
    pub compact: bool,
    /// Authoritative value; replaced only by applied commits.
    pub committed: Option<EditorValue>,
    pub editor: EditorState,
}

impl ParameterEntry {
    pub fn from_spec(spec: &ParameterSpec) -> Self {
        Self {
            key: spec.key.clone(),
            label: spec.label.clone(),
            format: spec.format,
            units: spec.units.clone(),
            compact: spec.compact,
            committed: spec.value.clone(),
            editor: EditorState::mount(spec.format, spec.value.as_ref()),
        }
    }

    /// Splits the entry into the editor's props and its mutable state.
    pub fn split(&mut self, connected: bool) -> (EditorProps<'_>, &mut EditorState) {
        let props = EditorProps {
            committed: self.committed.as_ref(),
            format: self.format,
            connected,
            compact: self.compact,
            label: Some(self.label.as_str()),
            units: self.units.as_deref(),
        };
        (props, &mut self.editor)
    }

    pub fn props(&self, connected: bool) -> EditorProps<'_> {
        EditorProps {
            committed: self.committed.as_ref(),
            format: self.format,
            connected,
            compact: self.compact,
            label: Some(self.label.as_str()),
            units: self.units.as_deref(),
        }
    }

    /// Committed value as shown in the list.
    pub fn display_value(&self) -> String {
        match (&self.committed, self.units.as_deref().filter(|_| self.format.has_units())) {
            (Some(value), Some(units)) => format!("{value} {units}"),
            (Some(value), None) => value.to_string(),
            (None, _) => "unset".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ParameterPanelState {
    entries: IndexMap<String, ParameterEntry>,
    list_state: ListState,
    mouse_over_index: Option<usize>,

    /// Container focus
    container: FocusFlag,
    pub f_list: FocusFlag,
}

impl ParameterPanelState {
    pub fn new<'a>(parameters: impl IntoIterator<Item = &'a ParameterSpec>) -> Self {
        let entries: IndexMap<String, ParameterEntry> = parameters
            .into_iter()
            .map(|spec| (spec.key.clone(), ParameterEntry::from_spec(spec)))
            .collect();
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            entries,
            list_state,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ParameterEntry> {
        self.entries.values()
    }

    pub fn get(&self, key: &str) -> Option<&ParameterEntry> {
        self.entries.get(key)
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn offset(&self) -> usize {
        self.list_state.offset()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Selects `index`, clamped to the last row.
    pub fn set_selected_index(&mut self, index: Option<usize>) {
        let index = index.filter(|_| !self.entries.is_empty()).map(|i| i.min(self.entries.len() - 1));
        self.list_state.select(index);
    }

    pub fn select_next(&mut self) {
        let next = self.selected_index().map_or(0, |i| i + 1);
        self.set_selected_index(Some(next));
    }

    pub fn select_previous(&mut self) {
        let previous = self.selected_index().map_or(0, |i| i.saturating_sub(1));
        self.set_selected_index(Some(previous));
    }

    pub fn selected(&self) -> Option<&ParameterEntry> {
        self.selected_index().and_then(|i| self.entries.get_index(i)).map(|(_, entry)| entry)
    }

    pub fn selected_mut(&mut self) -> Option<&mut ParameterEntry> {
        let index = self.selected_index()?;
        self.entries.get_index_mut(index).map(|(_, entry)| entry)
    }

    pub fn mouse_over_index(&self) -> Option<usize> {
        self.mouse_over_index
    }

    pub fn set_mouse_over_index(&mut self, index: Option<usize>) {
        self.mouse_over_index = index.filter(|i| *i < self.entries.len());
    }

    /// Replaces the committed value of `key`.
    ///
    /// Returns `false` when no such parameter exists. The editor's pending
    /// state is left alone; it only reads the new value as a prop.
    pub fn apply_commit(&mut self, key: &str, value: EditorValue) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.committed = Some(value);
                true
            }
            None => false,
        }
    }

    /// Whether focus sits inside the selected editor.
    pub fn is_editor_focused(&self) -> bool {
        self.selected().is_some_and(|entry| entry.editor.is_focused())
    }
}

impl HasFocus for ParameterPanelState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        builder.leaf_widget(&self.f_list);
        if let Some(entry) = self.selected() {
            builder.widget(&entry.editor);
        }
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knobs_util::KnobsConfig;

    fn demo_panel() -> ParameterPanelState {
        let config = KnobsConfig::builtin();
        ParameterPanelState::new(config.parameters.values())
    }

    #[test]
    fn first_parameter_is_selected_on_load() {
        let panel = demo_panel();
        assert_eq!(panel.selected_index(), Some(0));
        assert_eq!(panel.selected().map(|entry| entry.key.as_str()), Some("device_name"));
    }

    #[test]
    fn selection_is_clamped_to_the_list() {
        let mut panel = demo_panel();
        panel.select_previous();
        assert_eq!(panel.selected_index(), Some(0));
        for _ in 0..20 {
            panel.select_next();
        }
        assert_eq!(panel.selected_index(), Some(panel.len() - 1));
    }

    #[test]
    fn commit_replaces_the_committed_value() {
        let mut panel = demo_panel();
        assert!(panel.apply_commit("buffer_frames", EditorValue::from(512u64)));
        assert_eq!(panel.get("buffer_frames").and_then(|entry| entry.committed.clone()), Some(EditorValue::from(512u64)));
        assert!(!panel.apply_commit("missing", EditorValue::Bool(true)));
    }

    #[test]
    fn display_value_appends_units() {
        let panel = demo_panel();
        assert_eq!(panel.get("sample_rate").map(ParameterEntry::display_value).as_deref(), Some("44100 Hz"));
        assert_eq!(panel.get("routing").map(ParameterEntry::display_value).as_deref(), Some("unset"));
    }

    #[test]
    fn boolean_editor_is_seeded_from_committed_value() {
        let panel = demo_panel();
        let muted = panel.get("muted").expect("muted parameter");
        assert_eq!(muted.editor.toggle_value(), Some(false));
    }
}
