//! Configuration file support for rulegen.
//!
//! rulegen supports two configuration file locations:
//! - Global: `~/.rulegen/config.toml` - User-wide defaults
//! - Project: `.rulegen/config.toml` - Workspace-specific overrides
//!
//! Project config takes precedence over global config. Every setting is
//! optional; unset settings fall back to the defaults of `ConvertOptions`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::convert::ConvertOptions;
use crate::core::ModuleKind;

/// rulegen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion settings
    pub convert: ConvertSettings,

    /// Condition label settings
    pub labels: LabelSettings,

    /// Output settings
    pub output: OutputSettings,
}

/// Conversion-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// File names that mark a directory as a package
    pub marker_files: Option<Vec<String>>,

    /// Extensions (without dot) of files collected as headers
    pub header_extensions: Option<Vec<String>>,

    /// Module kinds that are never converted
    pub disabled_kinds: Option<Vec<ModuleKind>>,
}

/// Labels used in generated `select()` expressions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Package holding the architecture constraint settings
    pub arch_prefix: Option<String>,

    /// Package holding the operating system constraint settings
    pub os_prefix: Option<String>,

    /// Label of the default condition
    pub default_condition: Option<String>,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Name of the generated build file in each package
    pub build_file_name: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.convert.marker_files.is_some() {
            self.convert.marker_files = other.convert.marker_files;
        }
        if other.convert.header_extensions.is_some() {
            self.convert.header_extensions = other.convert.header_extensions;
        }
        if other.convert.disabled_kinds.is_some() {
            self.convert.disabled_kinds = other.convert.disabled_kinds;
        }

        if other.labels.arch_prefix.is_some() {
            self.labels.arch_prefix = other.labels.arch_prefix;
        }
        if other.labels.os_prefix.is_some() {
            self.labels.os_prefix = other.labels.os_prefix;
        }
        if other.labels.default_condition.is_some() {
            self.labels.default_condition = other.labels.default_condition;
        }

        if other.output.build_file_name.is_some() {
            self.output.build_file_name = other.output.build_file_name;
        }
    }

    /// Conversion options with defaults filled in.
    pub fn convert_options(&self) -> ConvertOptions {
        let mut opts = ConvertOptions::default();
        if let Some(ref markers) = self.convert.marker_files {
            opts.marker_files = markers.clone();
        }
        if let Some(ref exts) = self.convert.header_extensions {
            opts.header_extensions = exts
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        if let Some(ref kinds) = self.convert.disabled_kinds {
            opts.disabled_kinds = kinds.clone();
        }
        if let Some(ref prefix) = self.labels.arch_prefix {
            opts.labels.arch_prefix = prefix.clone();
        }
        if let Some(ref prefix) = self.labels.os_prefix {
            opts.labels.os_prefix = prefix.clone();
        }
        if let Some(ref label) = self.labels.default_condition {
            opts.labels.default_condition = label.clone();
        }
        opts
    }

    /// Name of the build file written into each package.
    pub fn build_file_name(&self) -> &str {
        self.output.build_file_name.as_deref().unwrap_or("BUILD.bazel")
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.rulegen/config.toml)
/// 2. Global config (~/.rulegen/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global rulegen config directory (~/.rulegen).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".rulegen"))
}

/// Get the global config path (~/.rulegen/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.rulegen/config.toml).
pub fn project_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".rulegen").join("config.toml")
}
