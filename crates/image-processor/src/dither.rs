//! Dithering algorithms for converting images to black-and-white.
//!
//! Provides error-diffusion dithering over a selectable kernel.

use std::str::FromStr;

use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::{ProcessError, Result};

/// Threshold separating black from white during diffusion.
const THRESHOLD: f32 = 128.0;

/// Error multiplier used when none is configured.
pub const DEFAULT_CONTRAST: f32 = 1.18;

const MAX_CONTRAST: f32 = 4.0;

/// Error-diffusion weight matrix.
///
/// Row 0 is the current scanline and the current pixel sits in its center
/// column; following rows spread error to the scanlines below. Weights at or
/// left of the center on row 0 are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionKernel {
    weights: Vec<Vec<f32>>,
    origin: usize,
}

impl DiffusionKernel {
    /// Classic 4-neighbour kernel:
    /// - Right:        7/16
    /// - Bottom-left:  3/16
    /// - Bottom:       5/16
    /// - Bottom-right: 1/16
    pub fn floyd_steinberg() -> Self {
        Self {
            weights: vec![
                vec![0.0, 0.0, 7.0 / 16.0],
                vec![3.0 / 16.0, 5.0 / 16.0, 1.0 / 16.0],
            ],
            origin: 1,
        }
    }

    /// 12-neighbour kernel spreading error over two scanlines, in 48ths.
    pub fn jarvis_judice_ninke() -> Self {
        Self {
            weights: vec![
                vec![0.0, 0.0, 0.0, 7.0 / 48.0, 5.0 / 48.0],
                vec![3.0 / 48.0, 5.0 / 48.0, 7.0 / 48.0, 5.0 / 48.0, 3.0 / 48.0],
                vec![1.0 / 48.0, 3.0 / 48.0, 5.0 / 48.0, 3.0 / 48.0, 1.0 / 48.0],
            ],
            origin: 2,
        }
    }
}

/// Named kernels selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelPreset {
    FloydSteinberg,
    #[default]
    JarvisJudiceNinke,
}

impl KernelPreset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FloydSteinberg => "floyd-steinberg",
            Self::JarvisJudiceNinke => "jarvis-judice-ninke",
        }
    }

    pub fn kernel(&self) -> DiffusionKernel {
        match self {
            Self::FloydSteinberg => DiffusionKernel::floyd_steinberg(),
            Self::JarvisJudiceNinke => DiffusionKernel::jarvis_judice_ninke(),
        }
    }
}

impl FromStr for KernelPreset {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Ok(Self::FloydSteinberg),
            "jarvis-judice-ninke" | "jarvis_judice_ninke" | "jjn" => Ok(Self::JarvisJudiceNinke),
            _ => Err(ProcessError::UnknownKernel(s.to_string())),
        }
    }
}

/// Per-call dithering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DitherSettings {
    pub kernel: DiffusionKernel,
    /// Multiplier applied to the diffused error. Values above 1 exaggerate
    /// contrast.
    pub contrast: f32,
}

impl Default for DitherSettings {
    fn default() -> Self {
        Self {
            kernel: KernelPreset::default().kernel(),
            contrast: DEFAULT_CONTRAST,
        }
    }
}

impl DitherSettings {
    pub fn new(kernel: DiffusionKernel, contrast: f32) -> Result<Self> {
        validate_contrast(contrast)?;
        Ok(Self { kernel, contrast })
    }
}

/// Check that an error multiplier is usable.
pub fn validate_contrast(contrast: f32) -> Result<()> {
    if !contrast.is_finite() || !(0.0..=MAX_CONTRAST).contains(&contrast) {
        return Err(ProcessError::InvalidContrast(contrast));
    }
    Ok(())
}

/// Dither an image to pure black-and-white.
///
/// The image is reduced to luma first, with alpha composited over black.
/// Every output pixel is either 0 or 255.
pub fn dither_monochrome(img: &DynamicImage, settings: &DitherSettings) -> GrayImage {
    let (width, height) = (img.width(), img.height());
    debug!(
        width,
        height,
        contrast = settings.contrast,
        "Applying error-diffusion dithering"
    );

    let luma = img.to_luma_alpha8();
    let mut buffer: Vec<f32> = luma
        .pixels()
        .map(|p| f32::from(p.0[0]) * f32::from(p.0[1]) / 255.0)
        .collect();

    let (w, h) = (width as usize, height as usize);
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let old_pixel = buffer[idx];
            let new_pixel = if old_pixel < THRESHOLD { 0.0 } else { 255.0 };
            buffer[idx] = new_pixel;

            let error = (old_pixel - new_pixel) * settings.contrast;
            distribute_error(&mut buffer, &settings.kernel, x, y, w, h, error);
        }
    }

    let output = GrayImage::from_fn(width, height, |x, y| {
        let val = buffer[y as usize * w + x as usize];
        Luma([if val < THRESHOLD { 0 } else { 255 }])
    });

    debug!("Dithering complete");
    output
}

/// Spread quantization error to the kernel's neighbours of `(x, y)`.
fn distribute_error(
    buffer: &mut [f32],
    kernel: &DiffusionKernel,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    error: f32,
) {
    for (dy, row) in kernel.weights.iter().enumerate() {
        let ty = y + dy;
        if ty >= height {
            break;
        }
        for (col, &weight) in row.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            let Some(tx) = (x + col).checked_sub(kernel.origin) else {
                continue;
            };
            if tx >= width {
                continue;
            }
            buffer[ty * width + tx] += error * weight;
        }
    }
}
