//! Resampling to the display size.
//!
//! Uses Lanczos3 filtering for high-quality scaling, either over the whole
//! image or over a view onto a resolved crop region.

use image::imageops::{self, FilterType};
use image::{GenericImageView, ImageBuffer, Rgba};
use offimg::{CropSpec, Rgba16Image, SubGrid};
use tracing::debug;

use crate::Result;

/// Resample an image to exactly `width × height`, ignoring its aspect ratio.
///
/// Returns a copy of the input if it already has the target dimensions.
pub fn resize_exact<I>(img: &I, width: u32, height: u32) -> Rgba16Image
where
    I: GenericImageView<Pixel = Rgba<u16>>,
{
    let (orig_w, orig_h) = img.dimensions();

    if (orig_w, orig_h) == (width, height) {
        debug!(width, height, "Image already at target size, skipping resize");
        return ImageBuffer::from_fn(width, height, |x, y| img.get_pixel(x, y));
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Resizing image"
    );

    imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// Crop `img` to the rectangle described by `spec` and resample it to
/// `width × height`.
///
/// The crop is resolved against the `width / height` aspect ratio, so a
/// single-axis spec yields an undistorted result. `spec` is updated with the
/// resolved corners.
pub fn crop_resize<I>(
    img: &I,
    spec: &mut CropSpec,
    width: u32,
    height: u32,
) -> Result<Rgba16Image>
where
    I: GenericImageView<Pixel = Rgba<u16>>,
{
    let aspect = f64::from(width) / f64::from(height);
    let rect = spec.resolve(aspect)?;
    let view = img.sub_grid(rect)?;

    let (view_w, view_h) = view.dimensions();
    debug!(
        x = rect.min.x,
        y = rect.min.y,
        view_w,
        view_h,
        "Cropped image"
    );

    Ok(resize_exact(&view, width, height))
}
