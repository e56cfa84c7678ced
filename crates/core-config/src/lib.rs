//! Engine configuration loading and parsing.
//!
//! The command engine takes every tunable as data instead of reaching for
//! module-level constants: buffer growth increments, the size of the
//! temporary variable bank, and the delimiter rules all live in
//! [`EngineConfig`], which the binary threads through table construction
//! and script execution. Defaults reproduce the engine's calibrated
//! constants (+3 row slots, +3 cell slots, +6 content bytes, 10 variables,
//! blacklist `'"\`).
//!
//! An optional `tabula.toml` (working directory first, then the platform
//! config dir) may override any subset of fields. Unknown fields are
//! tolerated and a file that fails to parse falls back to defaults, so a
//! broken config never blocks a batch run.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, info};

/// Capacity growth increments for the table's three buffer layers.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct GrowthConfig {
    /// Row slots added when the table's row buffer fills up.
    #[serde(default = "GrowthConfig::default_rows_step")]
    pub rows_step: usize,
    /// Cell slots added when a row's cell buffer fills up.
    #[serde(default = "GrowthConfig::default_cells_step")]
    pub cells_step: usize,
    /// Bytes added when a cell's content buffer is outgrown.
    #[serde(default = "GrowthConfig::default_content_step")]
    pub content_step: usize,
}

impl GrowthConfig {
    const fn default_rows_step() -> usize {
        3
    }
    const fn default_cells_step() -> usize {
        3
    }
    const fn default_content_step() -> usize {
        6
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            rows_step: Self::default_rows_step(),
            cells_step: Self::default_cells_step(),
            content_step: Self::default_content_step(),
        }
    }
}

/// Temporary variable bank sizing.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct VariableConfig {
    /// Number of `_N` slots; slot indices are `0..count`.
    #[serde(default = "VariableConfig::default_count")]
    pub count: usize,
}

impl VariableConfig {
    const fn default_count() -> usize {
        10
    }
}

impl Default for VariableConfig {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
        }
    }
}

/// Delimiter acceptance rules for the CLI surface.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DelimiterConfig {
    /// Bytes that may never act as delimiters; they carry the escape
    /// context the lexer depends on.
    #[serde(default = "DelimiterConfig::default_blacklist")]
    pub blacklist: String,
    /// Delimiter set used when the command line names none.
    #[serde(default = "DelimiterConfig::default_delims")]
    pub default: String,
}

impl DelimiterConfig {
    fn default_blacklist() -> String {
        "'\"\\".to_string()
    }
    fn default_delims() -> String {
        " ".to_string()
    }

    /// Whether `delims` is a usable delimiter set: non-empty, ASCII only
    /// (lexer positions must stay on character boundaries), and free of
    /// blacklisted bytes.
    pub fn accepts(&self, delims: &str) -> bool {
        !delims.is_empty()
            && delims.is_ascii()
            && !delims.chars().any(|c| self.blacklist.contains(c))
    }
}

impl Default for DelimiterConfig {
    fn default() -> Self {
        Self {
            blacklist: Self::default_blacklist(),
            default: Self::default_delims(),
        }
    }
}

/// The full configuration record handed to the engine.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default)]
    pub growth: GrowthConfig,
    #[serde(default)]
    pub variables: VariableConfig,
    #[serde(default)]
    pub delimiters: DelimiterConfig,
}

/// Best-effort config path following platform conventions: prefer a local
/// `tabula.toml` before falling back to the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("tabula.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("tabula").join("tabula.toml");
    }
    PathBuf::from("tabula.toml")
}

/// Load the configuration, falling back to defaults when the file is
/// missing or unparsable.
pub fn load_from(path: Option<PathBuf>) -> Result<EngineConfig> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<EngineConfig>(&content) {
            Ok(config) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(config)
            }
            Err(err) => {
                debug!(target: "config", path = %path.display(), %err, "config_parse_failed_using_defaults");
                Ok(EngineConfig::default())
            }
        }
    } else {
        Ok(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.growth.rows_step, 3);
        assert_eq!(cfg.growth.cells_step, 3);
        assert_eq!(cfg.growth.content_step, 6);
        assert_eq!(cfg.variables.count, 10);
        assert_eq!(cfg.delimiters.default, " ");
    }

    #[test]
    fn parses_partial_override() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[growth]\nrows_step = 8\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.growth.rows_step, 8);
        // untouched sections keep their defaults
        assert_eq!(cfg.growth.cells_step, 3);
        assert_eq!(cfg.variables.count, 10);
    }

    #[test]
    fn parses_variable_count() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[variables]\ncount = 16\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.variables.count, 16);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[growth\nnot toml").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn delimiter_acceptance() {
        let d = DelimiterConfig::default();
        assert!(d.accepts(" "));
        assert!(d.accepts(",;"));
        assert!(!d.accepts(""));
        assert!(!d.accepts("\""));
        assert!(!d.accepts("a'b"));
        assert!(!d.accepts("a\\"));
        assert!(!d.accepts("é"));
    }
}
