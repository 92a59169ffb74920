//! Setting keys and their default values.

use image_processor::KernelPreset;

/// Output path used when `-o` is not given.
pub const DEFAULT_OUTPUT: &str = "output.bmp";

pub const DEFAULT_DITHER: bool = true;

pub const DEFAULT_CONTRAST: f32 = image_processor::dither::DEFAULT_CONTRAST;

pub const DEFAULT_KERNEL: KernelPreset = KernelPreset::JarvisJudiceNinke;

// Environment overrides, applied when the matching flag is absent.
pub const ENV_DITHER: &str = "MKOFFIMG_DITHER";
pub const ENV_CONTRAST: &str = "MKOFFIMG_CONTRAST";
pub const ENV_KERNEL: &str = "MKOFFIMG_KERNEL";
pub const ENV_CROP: &str = "MKOFFIMG_CROP";

/// Candidate `.env` locations, searched in order.
pub const DOTENV_CANDIDATES: [&str; 2] = [".env", "../.env"];
