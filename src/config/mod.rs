use crate::algorithms::{ResampleFilter, DEFAULT_CRACK_RATIO};
use crate::data::DEFAULT_SUFFIX;
use crate::logging::LoggingConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bounding box the input is scaled into before filtering
    pub max_width: u32,
    pub max_height: u32,
    pub resample_filter: ResampleFilter,
    /// White-pixel share above which an image is reported as cracked
    pub crack_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Inserted between the source stem and the threshold in output names
    pub suffix: String,
    /// Append `_1`, `_2`, ... instead of replacing an existing output file
    pub avoid_overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub extensions: Vec<String>,
    /// Worker threads for batch runs; 0 lets rayon decide
    pub threads: usize,
    pub recursive: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_width: 640,
            max_height: 480,
            resample_filter: ResampleFilter::CatmullRom,
            crack_ratio: DEFAULT_CRACK_RATIO,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            avoid_overwrite: false,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: ["png", "jpg", "jpeg", "bmp", "tif", "tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            threads: 0,
            recursive: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;

        if content.trim_start().starts_with('{') {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing JSON config {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("parsing TOML config {}", path.display()))
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ConfigFormat) -> crate::Result<()> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path.as_ref(), content)
            .with_context(|| format!("writing config {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.pipeline.max_width == 0 || self.pipeline.max_height == 0 {
            errors.push("pipeline bounding box must be non-zero on both axes".to_string());
        }

        if !(0.0..1.0).contains(&self.pipeline.crack_ratio) {
            errors.push(format!(
                "pipeline crack_ratio must be in [0, 1), got {}",
                self.pipeline.crack_ratio
            ));
        }

        if self.output.suffix.is_empty() {
            errors.push("output suffix must not be empty".to_string());
        }

        if self.output.suffix.contains(['/', '\\']) {
            errors.push("output suffix must not contain path separators".to_string());
        }

        if self.batch.extensions.is_empty() {
            errors.push("batch extensions must list at least one format".to_string());
        }

        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// JSON for `.json` paths, TOML otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Load `config_path`, falling back to the defaults when it is missing or
/// invalid. Problems go to stderr since logging is not configured yet.
pub fn load_config_or_default(config_path: Option<&Path>) -> Config {
    load_config_reporting(config_path, &mut std::io::stderr())
}

/// [`load_config_or_default`] writing its diagnostics to `out`.
pub fn load_config_reporting<W: Write>(config_path: Option<&Path>, out: &mut W) -> Config {
    let Some(path) = config_path else {
        return Config::default();
    };

    match Config::load_from_file(path) {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(errors) => {
                let _ = writeln!(out, "Configuration validation errors in '{}':", path.display());
                for error in errors {
                    let _ = writeln!(out, "  - {error}");
                }
                let _ = writeln!(out, "Using default configuration instead.");
                Config::default()
            }
        },
        Err(e) => {
            let _ = writeln!(out, "Failed to load config from '{}': {e:#}", path.display());
            let _ = writeln!(out, "Using default configuration.");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_reference_pipeline() {
        let config = Config::default();
        assert_eq!(config.pipeline.max_width, 640);
        assert_eq!(config.pipeline.max_height, 480);
        assert_eq!(config.pipeline.crack_ratio, 0.01);
        assert_eq!(config.output.suffix, "_binarizada");
        assert!(!config.output.avoid_overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crack.toml");
        let mut config = Config::default();
        config.pipeline.max_width = 320;
        config.output.avoid_overwrite = true;

        config.save_to_file(&path, ConfigFormat::Toml).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.pipeline.max_width, 320);
        assert!(loaded.output.avoid_overwrite);
    }

    #[test]
    fn test_json_detected_by_brace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crack.cfg");
        std::fs::write(&path, r#"{ "pipeline": { "crack_ratio": 0.05 } }"#).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.pipeline.crack_ratio, 0.05);
        assert_eq!(loaded.pipeline.max_height, 480);
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = Config::default();
        config.pipeline.max_width = 0;
        config.pipeline.crack_ratio = 1.5;
        config.output.suffix.clear();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[pipeline]\nmax_width = 0\n").unwrap();
        let mut report = Vec::new();
        let config = load_config_reporting(Some(path.as_path()), &mut report);
        assert_eq!(config.pipeline.max_width, 640);

        let report = String::from_utf8(report).unwrap();
        assert!(report.contains("Configuration validation errors"));
        assert!(report.contains("bounding box"));
        assert!(report.contains("Using default configuration"));
    }

    #[test]
    fn test_unreadable_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut report = Vec::new();
        let missing = dir.path().join("absent.toml");
        let config = load_config_reporting(Some(missing.as_path()), &mut report);
        assert_eq!(config.output.suffix, "_binarizada");
        assert!(String::from_utf8(report)
            .unwrap()
            .contains("Failed to load config"));
    }

    #[test]
    fn test_no_path_is_silent() {
        let mut report = Vec::new();
        load_config_reporting(None, &mut report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
    }
}
