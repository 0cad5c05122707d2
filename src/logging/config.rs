//! Logging configuration system
//!
//! Per-component log levels and output destinations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub global_level: String,

    /// Level for `crack_detect::pipeline`
    pub pipeline_level: String,

    /// Level for `crack_detect::algorithms`
    pub algorithm_level: String,

    /// Enable console output
    pub console_output: bool,

    /// Directory for log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// Include file location in logs (impacts performance)
    pub include_file_location: bool,

    /// Write the file log as JSON lines instead of plain text
    pub json_file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: "info".to_string(),
            pipeline_level: "info".to_string(),
            algorithm_level: "info".to_string(),
            console_output: true,
            log_directory: None,
            include_file_location: false,
            json_file_output: true,
        }
    }
}

impl LoggingConfig {
    /// Create a development configuration with verbose logging
    pub fn development() -> Self {
        Self {
            global_level: "debug".to_string(),
            pipeline_level: "debug".to_string(),
            algorithm_level: "trace".to_string(),
            console_output: true,
            log_directory: Some(PathBuf::from("logs")),
            include_file_location: true,
            json_file_output: false,
        }
    }

    /// Create a production configuration with minimal overhead
    pub fn production() -> Self {
        Self {
            global_level: "warn".to_string(),
            pipeline_level: "info".to_string(),
            algorithm_level: "warn".to_string(),
            console_output: false,
            log_directory: Some(PathBuf::from("/var/log/crack-detect")),
            include_file_location: false,
            json_file_output: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, level) in [
            ("global_level", &self.global_level),
            ("pipeline_level", &self.pipeline_level),
            ("algorithm_level", &self.algorithm_level),
        ] {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(format!(
                    "Invalid {name}: {level}. Must be one of: {VALID_LEVELS:?}"
                ));
            }
        }

        if let Some(ref log_dir) = self.log_directory {
            if let Some(parent) = log_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(format!("Log directory parent does not exist: {parent:?}"));
                }
            }
        }

        Ok(())
    }

    /// Get the effective log level for a specific component
    pub fn get_component_level(&self, component: &str) -> &str {
        match component {
            "pipeline" => &self.pipeline_level,
            "algorithm" | "algorithms" => &self.algorithm_level,
            _ => &self.global_level,
        }
    }

    /// `EnvFilter` directives for this configuration.
    pub fn filter_directives(&self) -> String {
        let krate = env!("CARGO_PKG_NAME").replace('-', "_");
        format!(
            "{krate}={},{krate}::pipeline={},{krate}::algorithms={}",
            self.global_level, self.pipeline_level, self.algorithm_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.global_level, "info");
        assert!(config.console_output);
        assert!(config.log_directory.is_none());
        assert!(!config.include_file_location);
    }

    #[test]
    fn test_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.global_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.global_level = "debug".to_string();
        config.algorithm_level = "loud".to_string();
        assert!(config.validate().unwrap_err().contains("algorithm_level"));
    }

    #[test]
    fn test_component_level_selection() {
        let config = LoggingConfig::development();
        assert_eq!(config.get_component_level("algorithms"), "trace");
        assert_eq!(config.get_component_level("pipeline"), "debug");
        assert_eq!(config.get_component_level("unknown"), "debug");
    }

    #[test]
    fn test_filter_directives() {
        let directives = LoggingConfig::production().filter_directives();
        assert!(directives.starts_with("crack_detect=warn"));
        assert!(directives.contains("crack_detect::pipeline=info"));
    }
}
