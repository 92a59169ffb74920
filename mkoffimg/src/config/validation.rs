//! Setting value validation.
//!
//! Each parser returns the typed value or a message suitable for
//! [`ConfigError::InvalidSetting`](super::ConfigError::InvalidSetting).

use image_processor::KernelPreset;
use image_processor::dither::validate_contrast;
use offimg::CropSpec;

pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err("must be 'true' or 'false'".into()),
    }
}

pub fn parse_contrast(value: &str) -> Result<f32, String> {
    let v: f32 = value.trim().parse().map_err(|_| "must be a float")?;
    check_contrast(v)?;
    Ok(v)
}

/// Range check shared by CLI and environment values.
pub fn check_contrast(value: f32) -> Result<(), String> {
    validate_contrast(value).map_err(|e| e.to_string())
}

pub fn parse_kernel(value: &str) -> Result<KernelPreset, String> {
    value
        .parse()
        .map_err(|e: image_processor::ProcessError| e.to_string())
}

/// Parse `x1:y1,x2:y2`.
pub fn parse_crop(value: &str) -> Result<CropSpec, String> {
    value.parse().map_err(|e: offimg::OffimgError| e.to_string())
}
