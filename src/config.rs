//! File configuration for the queryshape CLI
//!
//! ```json
//! {
//!   "labels": { "EXACT": "e", "RANGE": "r", "TEST": "t" },
//!   "max_depth": 64,
//!   "log_level": "WARN"
//! }
//! ```
//!
//! Every field is optional. Missing labels fall back to the class names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::{CliError, CliResult};
use crate::observability::Severity;
use crate::shape::{ShapeLabels, ShapeOptions, DEFAULT_MAX_DEPTH};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Output label per restrictiveness class
    #[serde(default)]
    pub labels: ShapeLabels,

    /// Recursion guard for nested query objects (default 64)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Minimum log severity written to stderr (default "WARN")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_log_level() -> String {
    Severity::Warn.as_str().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labels: ShapeLabels::default(),
            max_depth: default_max_depth(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from an optional path, using defaults when none is given
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.max_depth == 0 {
            return Err(CliError::config_error("max_depth must be > 0"));
        }

        for (class, label) in [
            ("EXACT", &self.labels.exact),
            ("RANGE", &self.labels.range),
            ("TEST", &self.labels.test),
        ] {
            if label.is_empty() {
                return Err(CliError::config_error(format!(
                    "Label for {} must not be empty",
                    class
                )));
            }
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected TRACE, INFO, WARN or ERROR.",
                self.log_level
            ))
        })
    }

    /// Classification options derived from this config
    pub fn shape_options(&self) -> ShapeOptions {
        ShapeOptions::default()
            .with_labels(self.labels.clone())
            .with_max_depth(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"{"labels": {"EXACT": "e", "RANGE": "r", "TEST": "t"}, "max_depth": 8, "log_level": "trace"}"#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.labels, ShapeLabels::new("e", "r", "t"));
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.severity().unwrap(), Severity::Trace);

        let options = config.shape_options();
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.labels.test, "t");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = write_config("{}");
        assert_eq!(Config::load(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let file = write_config(r#"{"max_depth": 0}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_empty_label_rejected() {
        let file = write_config(r#"{"labels": {"RANGE": ""}}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.message().contains("RANGE"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let file = write_config(r#"{"log_level": "LOUD"}"#);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        let file = write_config("{not json");
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "SHAPE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = Config::load(Path::new("/nonexistent/queryshape.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
