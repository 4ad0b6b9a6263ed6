use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::file_utils::DOCX_SUFFIX;

// Application configuration module
// This module handles loading and validating configuration settings.
// Marker phrases and glyphs are fixed and not part of the configuration.

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "fix-checkbox.json";

/// Document processed when no path is given
pub const DEFAULT_TEMPLATE_PATH: &str = "src/templates/certificate-template.docx";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Document to process
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level for the stderr logger
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the log crate
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_template_path() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_PATH)
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load an explicitly requested file, else the default file if present, else defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let path = self.template_path.to_string_lossy();

        if path.trim().is_empty() {
            return Err(AppError::Config("Template path must not be empty".to_string()));
        }

        if !path.ends_with(DOCX_SUFFIX) || path == DOCX_SUFFIX {
            return Err(AppError::Config(format!(
                "Template path must end in {}: {}",
                DOCX_SUFFIX, path
            )));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            template_path: default_template_path(),
            log_level: LogLevel::default(),
        }
    }
}
