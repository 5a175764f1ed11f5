//! UI components: the parameter panel and the value editor it hosts.

pub mod common;
pub mod component;
pub mod parameter_panel;
pub mod value_editor;

pub use component::*;
pub use parameter_panel::ParameterPanelComponent;
