//! Configuration management for the Pod validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (podvalid.toml)
//! - Environment variables (PODVALID__*)
//!
//! ## Example config file (podvalid.toml):
//! ```toml
//! [validation]
//! stop_on_first_error = false
//!
//! [output]
//! format = "text"
//! success_message = "YAML is valid!"
//! yaml_extensions = ["yaml", "yml"]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Rule engine settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Reporting settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Rule engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Report only the first violation in traversal order
    #[serde(default)]
    pub stop_on_first_error: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// How diagnostics are printed
    #[serde(default)]
    pub format: OutputFormat,

    /// Printed when every document is valid (text format only)
    #[serde(default = "default_success_message")]
    pub success_message: String,

    /// File extensions picked up when a directory is given
    #[serde(default = "default_yaml_extensions")]
    pub yaml_extensions: Vec<String>,
}

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One diagnostic per line
    #[default]
    Text,
    /// A JSON array of diagnostic objects
    Json,
}

fn default_success_message() -> String {
    "YAML is valid!".to_string()
}

fn default_yaml_extensions() -> Vec<String> {
    vec!["yaml".to_string(), "yml".to_string()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            success_message: default_success_message(),
            yaml_extensions: default_yaml_extensions(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration, with `config_path` layered over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "podvalid.toml",
            ".podvalid.toml",
            "config/podvalid.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("io", "bigbrother", "podvalid") {
            let xdg_config = config_dir.config_dir().join("podvalid.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // PODVALID__VALIDATION__STOP_ON_FIRST_ERROR=true
        builder = builder.add_source(
            Environment::with_prefix("PODVALID")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| crate::ValidatorError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
