//! Configuration and filesystem helpers shared by the Knobs CLI and TUI.

pub mod config;
mod path_processing;

pub use config::{CONFIG_PATH_ENV, ConfigError, ConfigSource, KnobsConfig, ParameterSpec, default_config_path};
pub use path_processing::{default_log_path, expand_tilde};
