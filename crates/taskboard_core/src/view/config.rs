//! Display configuration collaborator.
//!
//! # Responsibility
//! - Define the recognized theming/copy keys and their defaults.
//! - Load overrides from JSON, falling back per key to defaults.
//!
//! # Invariants
//! - `ConfigProvider::init` invokes `on_change` at least once with the
//!   effective configuration before returning `Ok`.
//! - Unknown keys in a config document are ignored.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Theming and copy for the board view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub app_title: String,
    pub welcome_message: String,
    pub add_task_button: String,
    pub complete_button: String,
    pub background_color: String,
    pub surface_color: String,
    pub text_color: String,
    pub primary_action_color: String,
    pub secondary_action_color: String,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            app_title: "Smart Task Manager".to_string(),
            welcome_message: "Organize your tasks with AI-powered prioritization".to_string(),
            add_task_button: "Add Task".to_string(),
            complete_button: "Complete".to_string(),
            background_color: "#f8fafc".to_string(),
            surface_color: "#ffffff".to_string(),
            text_color: "#1e293b".to_string(),
            primary_action_color: "#3b82f6".to_string(),
            secondary_action_color: "#10b981".to_string(),
            font_family: "Inter".to_string(),
            font_size: 16.0,
        }
    }
}

impl DisplayConfig {
    /// Parses a JSON object, filling missing keys from `Default`.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }
}

/// Errors raised while resolving display configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read display config: {err}"),
            Self::Parse(err) => write!(f, "invalid display config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

/// Display-configuration collaborator contract.
pub trait ConfigProvider {
    /// Resolves the effective configuration and reports it through `on_change`.
    fn init(
        &mut self,
        defaults: DisplayConfig,
        on_change: &mut dyn FnMut(&DisplayConfig),
    ) -> Result<(), ConfigError>;
}

/// Provider that always reports its defaults unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticConfigProvider;

impl ConfigProvider for StaticConfigProvider {
    fn init(
        &mut self,
        defaults: DisplayConfig,
        on_change: &mut dyn FnMut(&DisplayConfig),
    ) -> Result<(), ConfigError> {
        on_change(&defaults);
        Ok(())
    }
}

/// Provider reading overrides from a JSON file.
///
/// A missing file yields the defaults passed to `init`.
#[derive(Debug, Clone)]
pub struct JsonFileConfigProvider {
    path: PathBuf,
}

impl JsonFileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigProvider for JsonFileConfigProvider {
    fn init(
        &mut self,
        defaults: DisplayConfig,
        on_change: &mut dyn FnMut(&DisplayConfig),
    ) -> Result<(), ConfigError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=config_init module=view status=ok source=defaults");
                on_change(&defaults);
                return Ok(());
            }
            Err(err) => {
                warn!("event=config_init module=view status=error error_code=config_read_failed");
                return Err(ConfigError::Io(err));
            }
        };

        let effective = merge_over(&defaults, &raw)?;
        info!("event=config_init module=view status=ok source=file");
        on_change(&effective);
        Ok(())
    }
}

/// Applies keys present in `raw` on top of `defaults`.
fn merge_over(defaults: &DisplayConfig, raw: &str) -> Result<DisplayConfig, ConfigError> {
    let overrides: serde_json::Value = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
    let mut base = serde_json::to_value(defaults).map_err(ConfigError::Parse)?;
    if let (Some(base_map), Some(override_map)) = (base.as_object_mut(), overrides.as_object()) {
        for (key, value) in override_map {
            if base_map.contains_key(key) && !value.is_null() {
                base_map.insert(key.clone(), value.clone());
            }
        }
    }
    serde_json::from_value(base).map_err(ConfigError::Parse)
}

#[cfg(test)]
mod tests {
    use super::{merge_over, DisplayConfig};

    #[test]
    fn merge_keeps_defaults_for_missing_keys() {
        let defaults = DisplayConfig {
            app_title: "Board".to_string(),
            ..DisplayConfig::default()
        };
        let merged = merge_over(&defaults, r#"{"font_size": 18, "unknown_key": true}"#).unwrap();

        assert_eq!(merged.app_title, "Board");
        assert_eq!(merged.font_size, 18.0);
    }

    #[test]
    fn merge_rejects_wrong_value_types() {
        let err = merge_over(&DisplayConfig::default(), r#"{"font_size": "large"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid display config"));
    }
}
