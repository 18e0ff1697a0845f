//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cmdtree/cmdtree.toml`
//! 3. Local config: `<cwd>/.cmdtree.toml`
//! 4. Environment variables: `CMDTREE_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub commands_dir: Option<PathBuf>,
    pub entry: Option<String>,
    pub default_module: Option<String>,
    pub module_extension: Option<String>,
}

/// Unified configuration for cmdtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the command tree (default: ./commands)
    pub commands_dir: PathBuf,
    /// Name the command tree is invoked as; first element of every command path
    pub entry: String,
    /// Module stem run when a directory is addressed (default: "default")
    pub default_module: String,
    /// Module file extension without the dot (default: "toml")
    pub module_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            commands_dir: PathBuf::from("commands"),
            entry: env!("CARGO_PKG_NAME").to_string(),
            default_module: "default".into(),
            module_extension: "toml".into(),
        }
    }
}

/// Get the XDG config directory for cmdtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cmdtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cmdtree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".cmdtree.toml")
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

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.commands_dir.to_string_lossy().as_ref());
        self.commands_dir = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    ///
    /// Relative `commands_dir` values are anchored at `base`, the directory
    /// holding the config file that set them.
    fn merge_with(&self, overlay: &RawSettings, base: Option<&Path>) -> Self {
        let commands_dir = match (&overlay.commands_dir, base) {
            (Some(dir), Some(base)) if dir.is_relative() && !dir.starts_with("~") => base.join(dir),
            (Some(dir), _) => dir.clone(),
            (None, _) => self.commands_dir.clone(),
        };
        Self {
            commands_dir,
            entry: overlay.entry.clone().unwrap_or_else(|| self.entry.clone()),
            default_module: overlay
                .default_module
                .clone()
                .unwrap_or_else(|| self.default_module.clone()),
            module_extension: overlay
                .module_extension
                .clone()
                .unwrap_or_else(|| self.module_extension.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.cmdtree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/cmdtree/cmdtree.toml`
    /// 3. Local config: `<project_dir>/.cmdtree.toml`
    /// 4. Environment variables: `CMDTREE_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw, None);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(dir));
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply CMDTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CMDTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("commands_dir") {
            settings.commands_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("entry") {
            settings.entry = val;
        }
        if let Ok(val) = config.get_string("default_module") {
            settings.default_module = val;
        }
        if let Ok(val) = config.get_string("module_extension") {
            settings.module_extension = val;
        }

        Ok(settings)
    }

    /// Override the command tree root (e.g. from `--commands-dir`).
    pub fn with_commands_dir(mut self, dir: PathBuf) -> Self {
        self.commands_dir = dir;
        self.expand_paths();
        self
    }

    /// Override the entry name (e.g. from `--entry`).
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cmdtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cmdtree/cmdtree.toml
#   Local:  ./.cmdtree.toml
#   Env:    CMDTREE_* environment variables
#   Flags:  --commands-dir, --entry
#
# Relative commands_dir in a local config is taken relative to that file.

# Root of the command tree
# commands_dir = "commands"

# Name the tree is invoked as (first word of every command path)
# entry = "cmdtree"

# Module run when a directory is addressed directly
# default_module = "default"

# Module file extension
# module_extension = "toml"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
