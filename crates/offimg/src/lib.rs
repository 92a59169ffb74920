//! Monochrome device bitmap encoding and crop-rectangle resolution.
//!
//! Produces the 400×240, 1 bit-per-pixel BMP files loaded by the target
//! display, and completes partially specified crop rectangles from two
//! reference points and a target aspect ratio.

pub mod bitmap;
pub mod crop;
pub mod grid;

// Re-exports for convenience
pub use bitmap::{BitmapLayout, write_image};
pub use crop::{CropSpec, Point, Rectangle};
pub use grid::{GridView, PixelGrid, Rgba16, Rgba16Image, SubGrid};

/// Width of the device bitmap in pixels.
pub const WIDTH: u32 = 400;

/// Height of the device bitmap in pixels.
pub const HEIGHT: u32 = 240;

/// Errors produced while resolving crops or encoding bitmaps.
#[derive(Debug, thiserror::Error)]
pub enum OffimgError {
    #[error("crop: {0}")]
    Geometry(String),

    #[error("{dimension} is {actual}, expect {expected} px")]
    Format {
        dimension: &'static str,
        actual: u32,
        expected: u32,
    },

    #[error("invalid crop points: {0}")]
    InvalidCropSpec(String),

    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for offimg operations.
pub type Result<T> = std::result::Result<T, OffimgError>;
