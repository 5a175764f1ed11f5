//! Parameter sheet loading for the Knobs CLI/TUI.
//!
//! A sheet lists the parameters the panel edits, each with a declared format
//! and an optional committed value, plus a preferred theme and the initial
//! link state. Sheets are YAML (default) or JSON, picked by file extension.
//! The default location is `~/.config/knobs/knobs.yaml` on most platforms;
//! when nothing exists there a built-in demo sheet is used.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use indexmap::IndexMap;
use knobs_types::{EditorError, EditorValue, ValueFormat};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::expand_tilde;

/// Environment variable allowing callers to override the sheet path.
pub const CONFIG_PATH_ENV: &str = "KNOBS_CONFIG";

/// Default filename inside the config directory.
pub const CONFIG_FILE_NAME: &str = "knobs.yaml";

/// Error surfaced when a sheet cannot be read or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("parameter #{index} has an empty key")]
    EmptyKey { index: usize },
    #[error("parameter '{0}' is declared more than once")]
    DuplicateKey(String),
    #[error("parameter '{key}': {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: EditorError,
    },
}

/// Where a loaded sheet came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    BuiltIn,
}

/// One editable parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub key: String,
    /// Display label; falls back to the key.
    pub label: String,
    pub format: ValueFormat,
    pub units: Option<String>,
    pub compact: bool,
    /// Committed value known at load time.
    pub value: Option<EditorValue>,
}

/// A validated parameter sheet.
#[derive(Debug, Clone)]
pub struct KnobsConfig {
    pub source: ConfigSource,
    pub theme: Option<String>,
    pub connected: bool,
    pub parameters: IndexMap<String, ParameterSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default = "default_connected")]
    connected: bool,
    #[serde(default)]
    parameters: Vec<RawParameter>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParameter {
    key: String,
    #[serde(default)]
    label: Option<String>,
    format: ValueFormat,
    #[serde(default)]
    units: Option<String>,
    #[serde(default)]
    compact: bool,
    #[serde(default)]
    value: Option<Value>,
}

fn default_connected() -> bool {
    true
}

impl KnobsConfig {
    /// Resolve and load the sheet.
    ///
    /// Order: `explicit` path, then [`CONFIG_PATH_ENV`], then the default
    /// config-dir location. Only a missing file at the default location falls
    /// back to [`KnobsConfig::builtin`]; explicit paths must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(&expand_tilde(&path.to_string_lossy()));
        }

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Self::from_path(&expand_tilde(trimmed));
            }
        }

        let default_path = default_config_path();
        match Self::from_path(&default_path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %default_path.display(), "No parameter sheet found; using the built-in demo sheet");
                Ok(Self::builtin())
            }
            other => other,
        }
    }

    /// Load a sheet from a specific file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let raw: RawConfig = if is_json {
            serde_json::from_str(&data).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_yaml::from_str(&data).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };
        debug!(path = %path.display(), parameters = raw.parameters.len(), "Loaded parameter sheet");
        Self::from_raw(raw, ConfigSource::File(path.to_path_buf()))
    }

    /// Parse a YAML sheet held in memory.
    pub fn from_yaml_str(data: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(data).map_err(|source| ConfigError::Yaml {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::from_raw(raw, ConfigSource::BuiltIn)
    }

    /// Demo sheet used when no file is configured.
    pub fn builtin() -> Self {
        let parameters = [
            builtin_parameter("device_name", "Device name", ValueFormat::String, None, Some("bench-01".into())),
            builtin_parameter(
                "sample_rate",
                "Sample rate",
                ValueFormat::NumberWithUnits,
                Some("Hz"),
                Some(EditorValue::from(44100u64)),
            ),
            builtin_parameter("buffer_frames", "Buffer frames", ValueFormat::Number, None, Some(EditorValue::from(256u64))),
            builtin_parameter("muted", "Muted", ValueFormat::Bool, None, Some(EditorValue::Bool(false))),
            builtin_parameter("routing", "Routing", ValueFormat::Json, None, None),
        ]
        .into_iter()
        .map(|parameter| (parameter.key.clone(), parameter))
        .collect();

        Self {
            source: ConfigSource::BuiltIn,
            theme: None,
            connected: true,
            parameters,
        }
    }

    fn from_raw(raw: RawConfig, source: ConfigSource) -> Result<Self, ConfigError> {
        let mut parameters = IndexMap::with_capacity(raw.parameters.len());
        for (index, parameter) in raw.parameters.into_iter().enumerate() {
            let key = parameter.key.trim().to_string();
            if key.is_empty() {
                return Err(ConfigError::EmptyKey { index });
            }
            if parameters.contains_key(&key) {
                return Err(ConfigError::DuplicateKey(key));
            }
            if parameter.units.is_some() && !parameter.format.has_units() {
                warn!(key = %key, format = %parameter.format, "Units are only shown for number+units parameters");
            }
            let value = match parameter.value {
                Some(value) => Some(EditorValue::for_format(parameter.format, value).map_err(|source| ConfigError::InvalidValue {
                    key: key.clone(),
                    source,
                })?),
                None => None,
            };
            let spec = ParameterSpec {
                label: parameter.label.unwrap_or_else(|| key.clone()),
                key: key.clone(),
                format: parameter.format,
                units: parameter.units,
                compact: parameter.compact,
                value,
            };
            parameters.insert(key, spec);
        }

        Ok(Self {
            source,
            theme: raw.theme,
            connected: raw.connected,
            parameters,
        })
    }
}

fn builtin_parameter(key: &str, label: &str, format: ValueFormat, units: Option<&str>, value: Option<EditorValue>) -> ParameterSpec {
    ParameterSpec {
        key: key.to_string(),
        label: label.to_string(),
        format,
        units: units.map(str::to_string),
        compact: false,
        value,
    }
}

/// Default sheet location inside the platform config directory.
pub fn default_config_path() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("knobs").join(CONFIG_FILE_NAME)
}
