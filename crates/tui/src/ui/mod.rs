//! UI rendering module for the TUI application.
//!
//! Holds the components, the root view, the terminal runtime and theming.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
