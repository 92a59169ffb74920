//! Runtime configuration assembled from CLI arguments + environment overrides.

use std::path::{Path, PathBuf};

use image_processor::{DitherSettings, KernelPreset};
use offimg::CropSpec;

use super::ConfigError;
use super::defaults::{
    DEFAULT_CONTRAST, DEFAULT_DITHER, DEFAULT_KERNEL, ENV_CONTRAST, ENV_CROP, ENV_DITHER,
    ENV_KERNEL,
};
use super::validation::{check_contrast, parse_bool, parse_contrast, parse_crop, parse_kernel};
use crate::cli::Cli;

/// Encoding chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 1 bit-per-pixel device bitmap.
    Bitmap,
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("bmp") => Ok(Self::Bitmap),
            Some("png") => Ok(Self::Png),
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            _ => Err(ConfigError::UnsupportedOutput(path.to_path_buf())),
        }
    }
}

/// Everything one conversion run needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub dither: bool,
    pub kernel: KernelPreset,
    pub dither_settings: DitherSettings,
    pub crop: Option<CropSpec>,
}

impl AppConfig {
    /// Load configuration from CLI arguments, falling back to the process
    /// environment for flags that were not given.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_sources(cli, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit environment lookup.
    pub fn from_sources<F>(cli: &Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let format = OutputFormat::from_path(&cli.output)?;

        let dither = match cli.dither {
            Some(v) => v,
            None => match env_value(ENV_DITHER) {
                Some(v) => parse_bool(&v).map_err(|m| invalid(ENV_DITHER, m))?,
                None => DEFAULT_DITHER,
            },
        };

        let contrast = match cli.contrast {
            Some(v) => {
                check_contrast(v).map_err(|m| invalid("--contrast", m))?;
                v
            }
            None => match env_value(ENV_CONTRAST) {
                Some(v) => parse_contrast(&v).map_err(|m| invalid(ENV_CONTRAST, m))?,
                None => DEFAULT_CONTRAST,
            },
        };

        let kernel = match (&cli.kernel, env_value(ENV_KERNEL)) {
            (Some(v), _) => parse_kernel(v).map_err(|m| invalid("--kernel", m))?,
            (None, Some(v)) => parse_kernel(&v).map_err(|m| invalid(ENV_KERNEL, m))?,
            (None, None) => DEFAULT_KERNEL,
        };

        let crop = match (&cli.crop, env_value(ENV_CROP)) {
            (Some(v), _) => Some(parse_crop(v).map_err(|m| invalid("--crop", m))?),
            (None, Some(v)) => Some(parse_crop(&v).map_err(|m| invalid(ENV_CROP, m))?),
            (None, None) => None,
        };

        let dither_settings = DitherSettings::new(kernel.kernel(), contrast)
            .map_err(|e| invalid("--contrast", e.to_string()))?;

        Ok(Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            format,
            dither,
            kernel,
            dither_settings,
            crop,
        })
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidSetting {
        key: key.to_string(),
        message,
    }
}
