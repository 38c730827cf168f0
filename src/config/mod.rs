//! Application Configuration
//!
//! Caption styling, capture and export preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compose::glyphs::BUNDLED_FONT_FAMILY;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Caption style settings
    pub style: StyleSettings,
    /// Image acquisition settings
    pub capture: CaptureSettings,
    /// Export and storage settings
    pub export: ExportSettings,
}

/// Caption appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    /// Display face name
    pub font_family: String,
    /// TrueType/OpenType file overriding the bundled display face
    pub font_path: Option<PathBuf>,
    /// Font size in points
    pub font_size: f32,
    /// Stroke width relative to font size (negative = stroke and fill)
    pub stroke_width: f32,
    /// Fill color as RGBA
    pub fill_color: [u8; 4],
    /// Stroke color as RGBA
    pub stroke_color: [u8; 4],
    /// Canvas width in points the font size is specified against
    pub reference_width: f32,
    /// Gap between caption and image edge in points
    pub margin: f32,
    /// Smallest size shrink-to-fit may use, in points
    pub minimum_font_size: f32,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            font_family: BUNDLED_FONT_FAMILY.to_string(),
            font_path: None,
            font_size: 40.0,
            stroke_width: -2.0,
            fill_color: [255, 255, 255, 255],
            stroke_color: [0, 0, 0, 255],
            reference_width: 375.0,
            margin: 12.0,
            minimum_font_size: 10.0,
        }
    }
}

/// Image acquisition settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Image file that stands in for the camera; no camera when unset
    pub camera_image: Option<PathBuf>,
}

/// Export-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Keep a copy of every shared meme
    pub store_memes: bool,
    /// Where shared memes are kept (platform data dir if unset)
    pub store_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            store_memes: true,
            store_dir: None,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        // Check style defaults
        assert_eq!(config.style.font_family, BUNDLED_FONT_FAMILY);
        assert!(config.style.font_path.is_none());
        assert!((config.style.font_size - 40.0).abs() < 0.01);
        assert!((config.style.stroke_width + 2.0).abs() < 0.01);
        assert_eq!(config.style.fill_color, [255, 255, 255, 255]);
        assert_eq!(config.style.stroke_color, [0, 0, 0, 255]);

        // Check capture defaults
        assert!(config.capture.camera_image.is_none());

        // Check export defaults
        assert!(config.export.store_memes);
        assert!(config.export.store_dir.is_none());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config.style.font_path = Some(PathBuf::from("/fonts/Anton-Regular.ttf"));
        config.style.font_size = 52.0;
        config.export.store_memes = false;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.style.font_path, config.style.font_path);
        assert!((parsed.style.font_size - 52.0).abs() < 0.01);
        assert!(!parsed.export.store_memes);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str("[style]\nmargin = 20.0\n").unwrap();

        assert!((parsed.style.margin - 20.0).abs() < 0.01);
        assert!((parsed.style.font_size - 40.0).abs() < 0.01);
        assert!(parsed.export.store_memes);
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config.style.font_family, loaded.style.font_family);
        assert_eq!(config.export.store_memes, loaded.export.store_memes);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
