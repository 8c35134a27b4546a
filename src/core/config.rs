//! HZ-014: Compiler settings.
//!
//! An optional YAML file; every key has a default so an absent file and an
//! empty file behave the same.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default prefix for every API task address. The placeholder is resolved by
/// the job runner, never here.
pub const DEFAULT_API_BASE: &str = "{system.api_host}/api/v1/core/admin";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Prefix joined with each element kind's endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Translation table behaviour
    #[serde(default)]
    pub translation: TranslationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            translation: TranslationSettings::default(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Settings {
    /// Join the API base with an endpoint suffix such as `/schemas`.
    pub fn endpoint(&self, suffix: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), suffix)
    }
}

/// Translation store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationSettings {
    /// How empty language slots appear in resolved text objects
    #[serde(default)]
    pub empty_slots: EmptySlots,

    /// Drop entries not touched during the run when writing the table
    #[serde(default)]
    pub prune_stale: bool,
}

/// Rendering of empty language slots in resolved text objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySlots {
    /// Leave empty slots out of the object
    #[default]
    Omit,
    /// Emit empty slots as `""`
    Keep,
}

/// Parse settings from YAML text.
pub fn parse_settings(yaml: &str) -> Result<Settings> {
    if yaml.trim().is_empty() {
        return Ok(Settings::default());
    }
    let parsed: Option<Settings> = serde_yaml_ng::from_str(yaml)
        .map_err(|e| Error::malformed(format!("settings: {}", e)))?;
    Ok(parsed.unwrap_or_default())
}

/// Load settings from a file.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_settings(&content)
}
