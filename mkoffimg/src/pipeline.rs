//! Conversion pipeline: decode, dither, crop/resize, encode.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, ImageFormat, ImageReader};
use image_processor::{crop_resize, dither_monochrome, resize_exact};
use offimg::{HEIGHT, Rgba16Image, WIDTH};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, OutputFormat};

/// Run one conversion described by `config`.
///
/// The output file is only created once the image has been processed.
pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let img = decode(&config.input)?;
    let display = process(img, config)?;
    write_output(&display, config.format, &config.output)?;
    info!(output = %config.output.display(), "Image written");
    Ok(())
}

/// Open and decode an image, guessing the format from its contents.
pub fn decode(path: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to read {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;
    info!(
        input = %path.display(),
        width = img.width(),
        height = img.height(),
        "Decoded input image"
    );
    Ok(img)
}

/// Turn a decoded image into a display-sized grid.
pub fn process(img: DynamicImage, config: &AppConfig) -> anyhow::Result<Rgba16Image> {
    let img = if config.dither {
        debug!(kernel = config.kernel.name(), "Dithering enabled");
        DynamicImage::ImageLuma8(dither_monochrome(&img, &config.dither_settings))
    } else {
        img
    };

    let grid = img.to_rgba16();
    let display = match config.crop {
        Some(mut spec) => {
            crop_resize(&grid, &mut spec, WIDTH, HEIGHT).context("crop/resize error")?
        }
        None => resize_exact(&grid, WIDTH, HEIGHT),
    };
    Ok(display)
}

/// Encode `display` into `w` in the given format.
pub fn encode<W: Write + Seek>(
    display: &Rgba16Image,
    format: OutputFormat,
    w: &mut W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Bitmap => offimg::write_image(display, w)?,
        OutputFormat::Png => {
            DynamicImage::ImageRgba16(display.clone()).write_to(w, ImageFormat::Png)?
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha and no 16-bit depth
            let rgb = DynamicImage::ImageRgba16(display.clone()).to_rgb8();
            DynamicImage::ImageRgb8(rgb).write_to(w, ImageFormat::Jpeg)?
        }
    }
    Ok(())
}

/// Create `path` and encode into it. A partially written file is removed.
pub fn write_output(
    display: &Rgba16Image,
    format: OutputFormat,
    path: &Path,
) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let result = encode(display, format, &mut writer)
        .and_then(|()| writer.flush().map_err(anyhow::Error::from));
    drop(writer);

    if let Err(e) = result {
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(output = %path.display(), "Failed to remove partial output: {remove_err}");
        }
        return Err(e.context(format!("failed to write {}", path.display())));
    }
    Ok(())
}
