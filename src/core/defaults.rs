use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

/// Extensions the rewriter touches.
pub const TARGET_EXTENSIONS: &[&str] = &["lua"];

/// Base file names never rewritten, regardless of directory.
pub const EXCLUDED_FILE_NAMES: &[&str] = &["urls.lua", "utils.lua"];

/// Path components that exclude every file beneath them. `utils` keeps the
/// rewriter out of the module that defines the redirected helpers.
pub const EXCLUDED_PATH_SEGMENTS: &[&str] = &["bak", "backup", "utils"];

/// Substrings that mark a line as a declaration or comment.
pub const PROTECTED_MARKERS: &[&str] = &["local ", "--"];

/// Ordered rewrite table: bare helper calls redirected into the `utils` module.
/// Evaluated top to bottom, first match wins per line.
pub const REWRITE_RULES: &[(&str, &str)] = &[
    ("list_extend", "utils.list_extend"),
    ("dict_update", "utils.dict_update"),
    ("dict", "utils.dict"),
    ("list", "utils.list"),
    ("split", "utils.split"),
    ("repr", "utils.repr"),
    ("serialize_basetype", "utils.serialize_basetype"),
];

/// Extensions scanned by the legacy whole-file replace and search.
pub const LEGACY_EXTENSIONS: &[&str] = &["lua", "tml"];

/// Legacy substring renames, applied one pass per pair.
pub const LEGACY_RULES: &[(&str, &str)] = &[("resty.model", "resty.mvc")];

/// Needles listed by the legacy search when none are given.
pub const LEGACY_SEARCH_TERMS: &[&str] = &["resty.model", "resty.mvc"];

/// A single (pattern, replacement) pair as it appears in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub replacement: String,
}

/// Rewriter configuration. Every field falls back to the built-in constants
/// when absent from a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_excluded_names")]
    pub excluded_names: Vec<String>,

    #[serde(default = "default_excluded_segments")]
    pub excluded_segments: Vec<String>,

    #[serde(default = "default_protected_markers")]
    pub protected_markers: Vec<String>,

    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excluded_names: default_excluded_names(),
            excluded_segments: default_excluded_segments(),
            protected_markers: default_protected_markers(),
            rules: default_rules(),
        }
    }
}

impl RewriteConfig {
    /// Load a JSON config file, filling missing fields with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = io::read_text(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    strings(TARGET_EXTENSIONS)
}

fn default_excluded_names() -> Vec<String> {
    strings(EXCLUDED_FILE_NAMES)
}

fn default_excluded_segments() -> Vec<String> {
    strings(EXCLUDED_PATH_SEGMENTS)
}

fn default_protected_markers() -> Vec<String> {
    strings(PROTECTED_MARKERS)
}

fn default_rules() -> Vec<RuleConfig> {
    REWRITE_RULES
        .iter()
        .map(|(pattern, replacement)| RuleConfig {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        })
        .collect()
}
