//! crfeval Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with defaults matching the CRF++ chunking sample data.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use crate::LabelUniverse;

/// Most decimal places a text report will print; beyond this f64 carries no digits
pub const MAX_REPORT_PRECISION: usize = 17;

/// Main evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Label universe in report order
    pub labels: Vec<String>,

    /// Input parsing
    pub input: InputConfig,

    /// Report and export output
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            labels: ["I-NP", "B-NP", "B-ADJP", "I-ADJP"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EvalConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variables on top (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        if let Ok(labels) = std::env::var("CRFEVAL_LABELS") {
            self.labels = parse_label_list(&labels);
        }
        if let Ok(delimiter) = std::env::var("CRFEVAL_DELIMITER") {
            self.input.delimiter = unescape_delimiter(&delimiter);
        }
        if let Ok(level) = std::env::var("CRFEVAL_LOG_LEVEL") {
            self.logging.level = level;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check values that would only fail later, at ingestion time
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.delimiter.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "input.delimiter".to_string(),
                value: String::new(),
            });
        }
        if self.labels.is_empty() {
            return Err(ConfigError::MissingRequired("labels".to_string()));
        }
        if self.output.precision > MAX_REPORT_PRECISION {
            return Err(ConfigError::InvalidValue {
                key: "output.precision".to_string(),
                value: self.output.precision.to_string(),
            });
        }
        if LevelFilter::from_str(&self.logging.level).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }
        Ok(())
    }

    /// Build the validated label universe from `labels`
    pub fn label_universe(&self) -> crate::Result<LabelUniverse> {
        LabelUniverse::new(self.labels.iter().cloned())
    }
}

/// Input parsing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Column separator; gold and predicted labels are the last two columns
    pub delimiter: String,

    /// Keep parsed records so predictions can be exported afterwards
    pub retain_records: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: "\t".to_string(),
            retain_records: true,
        }
    }
}

/// Report and export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination for correctly predicted lines
    pub correct_file: PathBuf,

    /// Destination for wrongly predicted lines
    pub wrong_file: PathBuf,

    /// Decimal places in text reports
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            correct_file: PathBuf::from("correct_predictions.txt"),
            wrong_file: PathBuf::from("wrong_predictions.txt"),
            precision: 6,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (off, trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Split a comma-separated label list, dropping blanks
pub fn parse_label_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shell-friendly spelling of control characters (`\t` → tab)
pub fn unescape_delimiter(raw: &str) -> String {
    match raw {
        "\\t" | "tab" => "\t".to_string(),
        "\\s" | "space" => " ".to_string(),
        other => other.to_string(),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

impl From<ConfigError> for crate::EvalError {
    fn from(err: ConfigError) -> Self {
        crate::EvalError::Configuration(err.to_string())
    }
}
