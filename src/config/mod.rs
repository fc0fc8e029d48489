//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// OCR engine settings
    pub ocr: OcrSettings,
    /// Output settings
    pub output: OutputSettings,
    /// Training-prep settings
    pub training: TrainingSettings,
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Tesseract language/model identifier (e.g. "eng")
    pub language: String,
    /// Directory holding the trained models; None uses the system default
    pub tessdata_dir: Option<PathBuf>,
    /// Source resolution hint passed to Tesseract, in DPI
    pub source_dpi: u32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            tessdata_dir: Some(PathBuf::from("tessdata")),
            source_dpi: 300,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory receiving the `.tif`/`.gt.txt` pairs (created if absent)
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("gt_files"),
        }
    }
}

/// Training-prep settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Directory receiving the generated unicharset
    pub tessdata_dir: PathBuf,
    /// Directory receiving the LSTMF list file
    pub lstmf_dir: PathBuf,
    /// Name (or path) of the unicharset extraction tool
    pub unicharset_tool: String,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            tessdata_dir: PathBuf::from("tessdata"),
            lstmf_dir: PathBuf::from("lstmf"),
            unicharset_tool: "unicharset_extractor".to_string(),
        }
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "cashea", "tessgt")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
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

        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.tessdata_dir, Some(PathBuf::from("tessdata")));
        assert_eq!(config.ocr.source_dpi, 300);

        assert_eq!(config.output.dir, PathBuf::from("gt_files"));

        assert_eq!(config.training.tessdata_dir, PathBuf::from("tessdata"));
        assert_eq!(config.training.lstmf_dir, PathBuf::from("lstmf"));
        assert_eq!(config.training.unicharset_tool, "unicharset_extractor");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.ocr.language, parsed.ocr.language);
        assert_eq!(config.ocr.source_dpi, parsed.ocr.source_dpi);
        assert_eq!(config.output.dir, parsed.output.dir);
        assert_eq!(
            config.training.unicharset_tool,
            parsed.training.unicharset_tool
        );
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.ocr.language = "lat".to_string();
        config.ocr.tessdata_dir = None;
        config.output.dir = PathBuf::from("/data/gt");

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.ocr.language, "lat");
        assert_eq!(parsed.ocr.tessdata_dir, None);
        assert_eq!(parsed.output.dir, PathBuf::from("/data/gt"));
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config.ocr.language, loaded.ocr.language);
        assert_eq!(config.output.dir, loaded.output.dir);
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
