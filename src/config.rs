//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dirsketch/dirsketch.toml`
//! 3. Local config: `<project_dir>/.dirsketch.toml`
//! 4. Environment variables: `DIRSKETCH_*` prefix

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ScriptFormat};
use crate::domain::parser::{DEFAULT_ROOT_NAME, DEFAULT_TAB_WIDTH};
use crate::domain::DEFAULT_INDENT_WIDTH;

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_root_name: Option<String>,
    pub tab_width: Option<usize>,
    pub indent_width: Option<usize>,
    pub script_format: Option<ScriptFormat>,
}

/// Unified configuration for dirsketch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root name used when a structure starts with `.` (default: project)
    pub default_root_name: String,
    /// Spaces per tab when measuring indentation (default: 4)
    pub tab_width: usize,
    /// Spaces per level when writing outlines (default: 2)
    pub indent_width: usize,
    /// Script format used when none is given (default: shell)
    pub script_format: ScriptFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_root_name: DEFAULT_ROOT_NAME.to_string(),
            tab_width: DEFAULT_TAB_WIDTH,
            indent_width: DEFAULT_INDENT_WIDTH,
            script_format: ScriptFormat::Shell,
        }
    }
}

/// Prefix of environment variables overriding settings (`DIRSKETCH_TAB_WIDTH`).
pub const ENV_PREFIX: &str = "DIRSKETCH";

/// Get the XDG config directory for dirsketch.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dirsketch").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dirsketch.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".dirsketch.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_root_name: overlay
                .default_root_name
                .clone()
                .unwrap_or_else(|| self.default_root_name.clone()),
            tab_width: overlay.tab_width.unwrap_or(self.tab_width),
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            script_format: overlay.script_format.unwrap_or(self.script_format),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.dirsketch.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        if let Some(dir) = project_dir {
            current = current.merge_local(dir)?;
        }

        // 4. Environment variables
        current.merge_env(Environment::with_prefix(ENV_PREFIX))
    }

    /// Merge `<dir>/.dirsketch.toml` onto self if it exists.
    pub fn merge_local(&self, dir: &Path) -> Result<Self, ApplicationError> {
        let local_path = local_config_path(dir);
        if !local_path.exists() {
            return Ok(self.clone());
        }
        debug!("loading local config {}", local_path.display());
        Ok(self.merge_with(&load_raw_settings(&local_path)?))
    }

    /// Apply `DIRSKETCH_*` variables from `env` as explicit overrides.
    ///
    /// Unset variables inherit; set but unparsable values are errors.
    pub fn merge_env(&self, env: Environment) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        let mut settings = self.clone();
        if let Some(val) = env_value(config.get_string("default_root_name"))? {
            settings.default_root_name = val;
        }
        if let Some(val) = env_value(config.get_int("tab_width"))? {
            settings.tab_width = to_width("tab_width", val)?;
        }
        if let Some(val) = env_value(config.get_int("indent_width"))? {
            settings.indent_width = to_width("indent_width", val)?;
        }
        if let Some(val) = env_value(config.get_string("script_format"))? {
            settings.script_format =
                ScriptFormat::from_str(&val, true).map_err(|e| ApplicationError::Config {
                    message: format!("script_format: {}", e),
                })?;
        }

        Ok(settings)
    }

    /// Serialize the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }

    /// Commented template for `config init`.
    pub fn template() -> String {
        let defaults = Self::default();
        format!(
            "# dirsketch configuration\n\
             \n\
             # Root name used when a structure starts with `.`\n\
             # default_root_name = \"{}\"\n\
             \n\
             # Spaces per tab when measuring indentation\n\
             # tab_width = {}\n\
             \n\
             # Spaces per level when writing outlines\n\
             # indent_width = {}\n\
             \n\
             # Default script format: python, batch or shell\n\
             # script_format = \"{}\"\n",
            defaults.default_root_name,
            defaults.tab_width,
            defaults.indent_width,
            defaults.script_format,
        )
    }
}

/// `None` for an unset key, an error for a value of the wrong type.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn to_width(key: &str, val: i64) -> Result<usize, ApplicationError> {
    usize::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{} must not be negative: {}", key, val),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            tab_width: Some(2),
            script_format: Some(ScriptFormat::Python),
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.tab_width, 2);
        assert_eq!(merged.script_format, ScriptFormat::Python);
        assert_eq!(merged.default_root_name, "project");
        assert_eq!(merged.indent_width, 2);
    }

    #[test]
    fn given_template_then_parses_as_empty_overlay() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.default_root_name.is_none());
        assert!(raw.script_format.is_none());
    }
}
