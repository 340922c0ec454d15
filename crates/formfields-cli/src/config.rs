//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - The `FORMFIELDS_CONFIG` environment variable (via clap)
//!
//! Command-line flags take precedence over everything loaded here.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use formfields_core::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Validation defaults
    pub validation: ValidationDefaults,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

/// Defaults for the validate command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationDefaults {
    /// Stop at the first failing field
    pub fail_fast: bool,

    /// Maximum number of errors to report (0 = unlimited)
    pub max_errors: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for ValidationDefaults {
    fn default() -> Self {
        Self {
            fail_fast: true,
            max_errors: 0,
        }
    }
}

impl ValidationDefaults {
    /// Build the engine configuration, letting command-line flags override
    pub fn to_validation_config(&self, all: bool, max_errors: Option<usize>) -> ValidationConfig {
        ValidationConfig {
            fail_fast: self.fail_fast && !all,
            max_errors: max_errors.unwrap_or(self.max_errors),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?,
            _ => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) if !path.exists() => Err(Error::FileNotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".formfields.yaml"),
            PathBuf::from(".formfields.json"),
            PathBuf::from(".formfields.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let formfields_dir = config_dir.join("formfields");
            paths.push(formfields_dir.join("config.yaml"));
            paths.push(formfields_dir.join("config.json"));
            paths.push(formfields_dir.join("config.toml"));
        }

        paths
    }

    /// Resolve the output format, preferring the command-line flag
    pub fn output_format(&self, flag: Option<OutputFormat>) -> Result<OutputFormat> {
        match flag {
            Some(format) => Ok(format),
            None => OutputFormat::from_name(&self.output.format).ok_or_else(|| {
                Error::config(format!("unknown output format '{}'", self.output.format))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.format, "human");
        assert!(config.validation.fail_fast);
        assert_eq!(config.validation.max_errors, 0);
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn test_load_yaml_partial() {
        let file = write_config(".yaml", "validation:\n  fail_fast: false\n");
        let config = Config::from_file(file.path()).unwrap();
        assert!(!config.validation.fail_fast);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_load_toml() {
        let file = write_config(
            ".toml",
            "[output]\nformat = \"json\"\n\n[validation]\nmax_errors = 5\n",
        );
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.output.format, "json");
        assert_eq!(config.validation.max_errors, 5);
        assert_eq!(config.output_format(None).unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_load_json() {
        let file = write_config(".json", r#"{"logging": {"level": "debug", "format": "json"}}"#);
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let file = write_config(".toml", "[output\n");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load_with_file(Some(Path::new("/nonexistent/formfields.yaml"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_flags_override_validation_defaults() {
        let defaults = ValidationDefaults::default();
        assert_eq!(defaults.to_validation_config(false, None), ValidationConfig::first_error());

        let all = defaults.to_validation_config(true, Some(2));
        assert!(!all.fail_fast);
        assert_eq!(all.max_errors, 2);
    }

    #[test]
    fn test_unknown_output_format() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();
        assert!(config.output_format(None).is_err());
        assert_eq!(config.output_format(Some(OutputFormat::Yaml)).unwrap(), OutputFormat::Yaml);
    }
}
