//! Configuration management module
//!
//! YAML configuration file with generator tunables, output defaults and the
//! log level. Every section is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use xpath_locator::GeneratorOptions;

use crate::errors::{PickerError, PickerResult};
use crate::output::OutputFormat;

/// Directory name under the platform config dir
pub const APP_DIR: &str = "xpath-picker";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Log level used when neither `RUST_LOG` nor `--log-level` is given
    pub log_level: Option<String>,

    /// Candidate generation tunables
    pub generator: GeneratorOptions,

    pub output: OutputConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when `--output` is not given
    pub format: OutputFormat,
}

/// `<config dir>/xpath-picker/config.yaml`
pub fn default_config_path() -> PickerResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or(PickerError::NoConfigDir)?;
    path.push(APP_DIR);
    path.push("config.yaml");
    Ok(path)
}

impl PickerConfig {
    pub fn from_yaml(content: &str, origin: &Path) -> PickerResult<Self> {
        serde_yaml::from_str(content).map_err(|source| PickerError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: Option<&Path>) -> PickerResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };

        if !path.exists() {
            warn!("Config file not found, using defaults: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| PickerError::io(&path, e))?;
        let config = Self::from_yaml(&content, &path)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "generator:\n  text_max_len: 40\noutput:\n  format: json\n";
        let config = PickerConfig::from_yaml(yaml, Path::new("inline")).unwrap();
        assert_eq!(config.generator.text_max_len, 40);
        assert_eq!(
            config.generator.attribute_names,
            GeneratorOptions::default().attribute_names
        );
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PickerConfig::load(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config, PickerConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level: debug").unwrap();
        writeln!(file, "generator:").unwrap();
        writeln!(file, "  transient_classes: [open]").unwrap();
        let config = PickerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.generator.transient_classes, vec!["open".to_string()]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generator: [not, a, map]").unwrap();
        assert!(matches!(
            PickerConfig::load(Some(file.path())),
            Err(PickerError::Config { .. })
        ));
    }
}
