mod parameter_panel_component;
mod state;

pub use parameter_panel_component::ParameterPanelComponent;
pub use state::{ParameterEntry, ParameterPanelState};
