//! CLI configuration
//!
//! Settings come from an optional TOML file:
//!
//! ```toml
//! [logging]
//! file = "tiffstacks.log"
//! level = "info"
//!
//! [convert]
//! overwrite = false
//! ```
//!
//! Missing sections and keys keep their defaults.

use log::{debug, LevelFilter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::tiff::errors::{TiffError, TiffResult};

/// Settings for the command-line tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    /// Log file path; `None` logs to stderr through env_logger
    pub log_file: Option<String>,
    /// Maximum log level
    pub log_level: LevelFilter,
    /// Whether convert may replace an existing output file
    pub overwrite: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        StackConfig {
            log_file: None,
            log_level: LevelFilter::Info,
            overwrite: false,
        }
    }
}

impl StackConfig {
    /// Loads the configuration file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(content: &str) -> TiffResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(TiffError::GenericError(format!("Failed to parse TOML: {}", e))),
        };

        let mut config = StackConfig::default();

        if let Some(logging) = toml_value.get("logging").and_then(|v| v.as_table()) {
            if let Some(file) = logging.get("file").and_then(|v| v.as_str()) {
                config.log_file = Some(file.to_string());
            }
            if let Some(level) = logging.get("level") {
                let level = level.as_str()
                    .ok_or_else(|| TiffError::GenericError("logging.level must be a string".to_string()))?;
                config.log_level = LevelFilter::from_str(level)
                    .map_err(|_| TiffError::GenericError(format!("Unknown log level: {}", level)))?;
            }
        }

        if let Some(convert) = toml_value.get("convert").and_then(|v| v.as_table()) {
            if let Some(overwrite) = convert.get("overwrite") {
                config.overwrite = overwrite.as_bool()
                    .ok_or_else(|| TiffError::GenericError("convert.overwrite must be a boolean".to_string()))?;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(StackConfig::from_toml_str("").unwrap(), StackConfig::default());
    }

    #[test]
    fn reads_all_sections() {
        let config = StackConfig::from_toml_str(r#"
            [logging]
            file = "stacks.log"
            level = "debug"

            [convert]
            overwrite = true
        "#).unwrap();

        assert_eq!(config.log_file.as_deref(), Some("stacks.log"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert!(config.overwrite);
    }

    #[test]
    fn rejects_unknown_level() {
        let result = StackConfig::from_toml_str("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(TiffError::GenericError(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(StackConfig::from_toml_str("[logging").is_err());
    }
}
