//! Project configuration.
//!
//! A config file bundles the naming rules, the source-side metadata written
//! into document headers and the diff thresholds. Every field has a default,
//! so a partial file (or none at all) is valid. Command-line flags override
//! whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::canonical::BuildOptions;
use crate::diff::DiffOptions;
use crate::error::SyncError;
use crate::naming::NamingConfig;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub naming: NamingConfig,
    pub source: SourceConfig,
    pub diff: DiffConfig,
}

/// Source-side settings for canonicalization and reverse conversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceConfig {
    pub framework: String,
    pub entry_file: String,
    pub style_strategy: String,
    pub smart_flatten: bool,
    /// Plugin-data namespace read by the reverse converter.
    pub namespace: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let build = BuildOptions::default();
        Self {
            framework: build.framework,
            entry_file: build.entry_file,
            style_strategy: build.style_strategy,
            smart_flatten: build.smart_flatten,
            namespace: None,
        }
    }
}

/// Diff thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffConfig {
    pub size_tolerance: f64,
    pub ignore_inert_wrappers: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        let opts = DiffOptions::default();
        Self {
            size_tolerance: opts.size_tolerance,
            ignore_inert_wrappers: opts.ignore_inert_wrappers,
        }
    }
}

impl SyncConfig {
    /// Build options for one canonicalization pass stamped with `generated_at`.
    pub fn build_options(&self, generated_at: impl Into<String>) -> BuildOptions {
        BuildOptions {
            framework: self.source.framework.clone(),
            entry_file: self.source.entry_file.clone(),
            style_strategy: self.source.style_strategy.clone(),
            generated_at: generated_at.into(),
            smart_flatten: self.source.smart_flatten,
        }
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            size_tolerance: self.diff.size_tolerance,
            ignore_inert_wrappers: self.diff.ignore_inert_wrappers,
            separator: self.naming.separator.clone(),
        }
    }
}

/// Loads a config file, picking YAML (`.yaml`, `.yml`) or JSON (`.json` or
/// no extension) by extension.
///
/// A file that does not exist yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<SyncConfig, SyncError> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(SyncConfig::default());
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let is_yaml = match extension.as_deref() {
        Some("yaml" | "yml") => true,
        None | Some("json") => false,
        Some(other) => {
            return Err(SyncError::UnsupportedFormat(format!(
                "config extension '.{other}' (supported: json, yaml, yml)"
            )));
        }
    };

    let text = fs::read_to_string(path)?;
    let parse_error = |message: String| SyncError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };
    if is_yaml {
        parse_yaml(&text).map_err(|e| parse_error(e.to_string()))
    } else {
        parse_json(&text).map_err(|e| parse_error(e.to_string()))
    }
}

/// Parses a YAML config document. An empty document yields the defaults.
pub fn parse_yaml(text: &str) -> Result<SyncConfig, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(SyncConfig::default());
    }
    serde_yaml::from_str(text)
}

pub fn parse_json(text: &str) -> Result<SyncConfig, serde_json::Error> {
    serde_json::from_str(text)
}
