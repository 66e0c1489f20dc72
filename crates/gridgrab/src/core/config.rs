//! Configuration loading and management.
//!
//! Every post-processing entry point takes its settings explicitly from an
//! [`EngineConfig`]. The config can be built in code or loaded from TOML, YAML
//! or JSON, and [`EngineConfig::discover`] looks for a `gridgrab.toml` in the
//! current directory and its parents.

use crate::ocr::ScaleAdvisor;
use crate::ocr::scale::{DEFAULT_LINE_HEIGHT, TARGET_LINE_HEIGHT};
use crate::table::GridSettings;
use crate::table::inference::{DEFAULT_GRID_SPACING, DEFAULT_OUTLIER_THRESHOLD, DEFAULT_REFINE_PASSES};
use crate::text::LanguageProfile;
use crate::{GridgrabError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`EngineConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "gridgrab.toml";

/// Main post-processing configuration.
///
/// # Example
///
/// ```rust
/// use gridgrab::core::config::EngineConfig;
///
/// // Create with defaults
/// let config = EngineConfig::default();
/// assert!(config.correct_errors);
/// assert!(!config.table.enabled);
///
/// // Load from TOML file
/// // let config = EngineConfig::from_toml_file("gridgrab.toml")?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Language tag handed to the backend; None = use the page's own tag
    #[serde(default)]
    pub language: Option<String>,

    /// Force space joining on or off regardless of language
    #[serde(default)]
    pub space_joining: Option<bool>,

    /// Repair letter/number confusions before joining
    #[serde(default = "default_true")]
    pub correct_errors: bool,

    /// Minimum word confidence when reading Tesseract TSV
    #[serde(default)]
    pub min_confidence: f64,

    #[serde(default)]
    pub table: TableConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub scale: ScaleConfig,
}

/// What a grid unit is when inferring a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableUnit {
    /// One unit per OCR line, carrying the joined line text
    #[default]
    Line,
    /// One unit per recognized word
    Word,
}

/// Table mode configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Infer a grid and emit tab-separated text
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub unit: TableUnit,

    /// Pixels between probes
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: u32,

    /// Bands with this many units or fewer are merged away
    #[serde(default = "default_outlier_threshold")]
    pub outlier_threshold: usize,

    #[serde(default = "default_refine_passes")]
    pub refine_passes: usize,
}

/// Search selection configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whole-word, case-sensitive matching instead of substring matching
    #[serde(default)]
    pub exact_match: bool,
}

/// Raster scaling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Line height in pixels the backend reads best
    #[serde(default = "default_target_line_height")]
    pub target_line_height: f64,

    /// Assumed line height when nothing was recognized
    #[serde(default = "default_line_height")]
    pub default_line_height: f64,

    /// Largest raster side handed to the backend (0 = unlimited)
    #[serde(default = "default_max_dimension")]
    pub max_image_dimension: u32,

    /// Captures narrower than this are padded before recognition
    #[serde(default = "default_min_pad")]
    pub min_pad_width: u32,

    /// Captures shorter than this are padded before recognition
    #[serde(default = "default_min_pad")]
    pub min_pad_height: u32,
}

fn default_true() -> bool {
    true
}
fn default_grid_spacing() -> u32 {
    DEFAULT_GRID_SPACING
}
fn default_outlier_threshold() -> usize {
    DEFAULT_OUTLIER_THRESHOLD
}
fn default_refine_passes() -> usize {
    DEFAULT_REFINE_PASSES
}
fn default_target_line_height() -> f64 {
    TARGET_LINE_HEIGHT
}
fn default_line_height() -> f64 {
    DEFAULT_LINE_HEIGHT
}
fn default_max_dimension() -> u32 {
    4096
}
fn default_min_pad() -> u32 {
    64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: None,
            space_joining: None,
            correct_errors: true,
            min_confidence: 0.0,
            table: TableConfig::default(),
            search: SearchConfig::default(),
            scale: ScaleConfig::default(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            unit: TableUnit::default(),
            grid_spacing: default_grid_spacing(),
            outlier_threshold: default_outlier_threshold(),
            refine_passes: default_refine_passes(),
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            target_line_height: default_target_line_height(),
            default_line_height: default_line_height(),
            max_image_dimension: default_max_dimension(),
            min_pad_width: default_min_pad(),
            min_pad_height: default_min_pad(),
        }
    }
}

impl TableConfig {
    pub fn grid_settings(&self) -> GridSettings {
        GridSettings {
            grid_spacing: self.grid_spacing,
            outlier_threshold: self.outlier_threshold,
            refine_passes: self.refine_passes,
        }
    }
}

impl ScaleConfig {
    pub fn advisor(&self) -> ScaleAdvisor {
        ScaleAdvisor {
            target_line_height: self.target_line_height,
            default_line_height: self.default_line_height,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `GridgrabError::Validation` if the file doesn't exist or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| GridgrabError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| GridgrabError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| GridgrabError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, picking the format from the file extension.
    ///
    /// `.yaml`/`.yml` and `.json` are recognized; anything else is read as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `gridgrab.toml` in current directory and parent directories.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(GridgrabError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("using config {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Checks the numeric settings.
    ///
    /// # Errors
    ///
    /// Returns `GridgrabError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.table.grid_spacing == 0 {
            return Err(GridgrabError::validation("table.grid_spacing must be greater than 0"));
        }
        if self.table.refine_passes == 0 {
            return Err(GridgrabError::validation("table.refine_passes must be at least 1"));
        }
        if !(self.scale.target_line_height.is_finite() && self.scale.target_line_height > 0.0) {
            return Err(GridgrabError::validation(format!(
                "scale.target_line_height must be positive, got {}",
                self.scale.target_line_height
            )));
        }
        if !(self.scale.default_line_height.is_finite() && self.scale.default_line_height > 0.0) {
            return Err(GridgrabError::validation(format!(
                "scale.default_line_height must be positive, got {}",
                self.scale.default_line_height
            )));
        }
        if !self.min_confidence.is_finite() {
            return Err(GridgrabError::validation("min_confidence must be a finite number"));
        }
        Ok(())
    }

    /// Joining rules for a page read with `page_language`, after applying the
    /// configured language and space-joining override.
    pub fn language_profile(&self, page_language: &str) -> LanguageProfile {
        let tag = self.language.as_deref().unwrap_or(page_language);
        LanguageProfile::from_tag(tag).with_space_joining(self.space_joining)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| GridgrabError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.correct_errors);
        assert!(!config.table.enabled);
        assert_eq!(config.table.unit, TableUnit::Line);
        assert_eq!(config.table.grid_settings(), GridSettings::default());
        assert_eq!(config.scale.max_image_dimension, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gridgrab.toml");

        fs::write(
            &config_path,
            r#"
correct_errors = false
language = "ja-JP"

[table]
enabled = true
unit = "word"
outlier_threshold = 1
        "#,
        )
        .unwrap();

        let config = EngineConfig::from_toml_file(&config_path).unwrap();
        assert!(!config.correct_errors);
        assert_eq!(config.language.as_deref(), Some("ja-JP"));
        assert!(config.table.enabled);
        assert_eq!(config.table.unit, TableUnit::Word);
        assert_eq!(config.table.outlier_threshold, 1);
        assert_eq!(config.table.grid_spacing, 3);
        assert_eq!(config.table.refine_passes, 5);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gridgrab.yaml");

        fs::write(
            &config_path,
            r#"
space_joining: false
search:
  exact_match: true
scale:
  max_image_dimension: 2000
"#,
        )
        .unwrap();

        let config = EngineConfig::from_file(&config_path).unwrap();
        assert_eq!(config.space_joining, Some(false));
        assert!(config.search.exact_match);
        assert_eq!(config.scale.max_image_dimension, 2000);
        assert_eq!(config.scale.target_line_height, 40.0);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gridgrab.json");
        fs::write(&config_path, r#"{"min_confidence": 60.0, "table": {"enabled": true}}"#).unwrap();

        let config = EngineConfig::from_file(&config_path).unwrap();
        assert_eq!(config.min_confidence, 60.0);
        assert!(config.table.enabled);
    }

    #[test]
    fn test_invalid_toml_is_validation_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gridgrab.toml");
        fs::write(&config_path, "table = [").unwrap();

        let result = EngineConfig::from_toml_file(&config_path);
        assert!(matches!(result, Err(GridgrabError::Validation { .. })));
    }

    #[test]
    fn test_missing_file_is_validation_error() {
        let result = EngineConfig::from_toml_file("/nonexistent/gridgrab.toml");
        assert!(matches!(result, Err(GridgrabError::Validation { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_spacing() {
        let mut config = EngineConfig::default();
        config.table.grid_spacing = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.table.refine_passes = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.scale.target_line_height = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_language_profile_override() {
        let config = EngineConfig::default();
        assert!(!config.language_profile("zh-Hans-CN").is_space_joining);
        assert!(config.language_profile("ar-SA").is_right_to_left);

        let config = EngineConfig {
            space_joining: Some(true),
            ..Default::default()
        };
        assert!(config.language_profile("ja").is_space_joining);

        let config = EngineConfig {
            language: Some("he".to_string()),
            ..Default::default()
        };
        assert!(config.language_profile("en-US").is_right_to_left);
    }

    #[test]
    #[serial]
    fn test_discover_gridgrab_toml() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("captures").join("today");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("gridgrab.toml"), "correct_errors = false\n").unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&nested).unwrap();

        let result = std::panic::catch_unwind(|| {
            let config = EngineConfig::discover().unwrap();
            assert!(config.is_some());
            assert!(!config.unwrap().correct_errors);
        });

        std::env::set_current_dir(&original_dir).unwrap();

        if let Err(e) = result {
            std::panic::resume_unwind(e);
        }
    }
}
