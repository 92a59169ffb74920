//! Configuration management: defaults, validation, loading from CLI + environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::{AppConfig, OutputFormat};

use std::path::PathBuf;

/// Errors found while assembling the runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidSetting { key: String, message: String },

    #[error("unsupported output format for '{}' (expected .bmp, .png, .jpg or .jpeg)", .0.display())]
    UnsupportedOutput(PathBuf),
}
