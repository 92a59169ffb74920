//! Image processing utilities for monochrome display output.
//!
//! Provides error-diffusion dithering with configurable kernels and
//! Lanczos3 resampling, optionally restricted to a resolved crop region.

pub mod dither;
pub mod resize;

// Re-exports for convenience
pub use dither::{DiffusionKernel, DitherSettings, KernelPreset, dither_monochrome};
pub use resize::{crop_resize, resize_exact};

/// Errors raised by processing steps.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Contrast must be a finite value between 0.0 and 4.0, got {0}")]
    InvalidContrast(f32),

    #[error("Unknown diffusion kernel '{0}'")]
    UnknownKernel(String),

    #[error(transparent)]
    Crop(#[from] offimg::OffimgError),
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessError>;
