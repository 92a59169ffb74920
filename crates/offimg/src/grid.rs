//! Pixel access contract shared by the encoder and the crop pipeline.

use image::{GenericImageView, ImageBuffer, Rgba};

use crate::crop::Rectangle;
use crate::{OffimgError, Result};

/// Alpha-premultiplied `[r, g, b, a]` on a 16-bit scale (`0..=0xffff`).
pub type Rgba16 = [u32; 4];

/// Owned 16-bit RGBA buffer, the format grids are decoded into.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// A 2-D grid of pixels readable as [`Rgba16`].
pub trait PixelGrid {
    /// `(width, height)` in pixels.
    fn extent(&self) -> (u32, u32);

    /// Channel values at `(x, y)`, premultiplied by alpha.
    fn rgba16(&self, x: u32, y: u32) -> Rgba16;
}

impl<I> PixelGrid for I
where
    I: GenericImageView<Pixel = Rgba<u16>>,
{
    fn extent(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn rgba16(&self, x: u32, y: u32) -> Rgba16 {
        let [r, g, b, a] = self.get_pixel(x, y).0.map(u32::from);
        [r * a / 0xffff, g * a / 0xffff, b * a / 0xffff, a]
    }
}

/// Read-only window onto another image. No pixels are copied.
#[derive(Debug)]
pub struct GridView<'a, I: ?Sized> {
    image: &'a I,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl<I: ?Sized> GridView<'_, I> {
    /// Position of the window's top-left corner in the underlying image.
    pub fn offsets(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

impl<I: ?Sized> Clone for GridView<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ?Sized> Copy for GridView<'_, I> {}

impl<I> GenericImageView for GridView<'_, I>
where
    I: GenericImageView + ?Sized,
{
    type Pixel = I::Pixel;

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        self.image.get_pixel(x + self.x, y + self.y)
    }
}

/// Grids that can hand out a bounded view onto their own storage.
pub trait SubGrid: PixelGrid {
    type View<'a>: PixelGrid
    where
        Self: 'a;

    /// View of `rect` clipped to the grid bounds. No pixels are copied.
    ///
    /// Fails when `rect` has no area or does not overlap the grid.
    fn sub_grid(&self, rect: Rectangle) -> Result<Self::View<'_>>;
}

impl<I> SubGrid for I
where
    I: GenericImageView<Pixel = Rgba<u16>>,
{
    type View<'a>
        = GridView<'a, I>
    where
        Self: 'a;

    fn sub_grid(&self, rect: Rectangle) -> Result<Self::View<'_>> {
        if rect.is_empty() {
            return Err(OffimgError::Geometry(format!(
                "empty rectangle ({}, {})-({}, {})",
                rect.min.x, rect.min.y, rect.max.x, rect.max.y
            )));
        }

        let (w, h) = GenericImageView::dimensions(self);
        let bounds = Rectangle::new(
            (0, 0),
            (
                i32::try_from(w).unwrap_or(i32::MAX),
                i32::try_from(h).unwrap_or(i32::MAX),
            ),
        );
        let clipped = rect.intersect(&bounds);
        if clipped.is_empty() {
            return Err(OffimgError::Geometry(format!(
                "rectangle ({}, {})-({}, {}) is outside the {w}x{h} image",
                rect.min.x, rect.min.y, rect.max.x, rect.max.y
            )));
        }

        // clipped lies within bounds, so every coordinate is non-negative
        Ok(GridView {
            image: self,
            x: clipped.min.x as u32,
            y: clipped.min.y as u32,
            width: clipped.width() as u32,
            height: clipped.height() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> Rgba16Image {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x * 1000) as u16, (y * 1000) as u16, 0, 0xffff])
        })
    }

    #[test]
    fn test_opaque_pixel_is_unchanged() {
        let img = Rgba16Image::from_pixel(1, 1, Rgba([0x1234, 0x5678, 0x9abc, 0xffff]));
        assert_eq!(img.rgba16(0, 0), [0x1234, 0x5678, 0x9abc, 0xffff]);
    }

    #[test]
    fn test_alpha_is_premultiplied() {
        let img = Rgba16Image::from_pixel(1, 1, Rgba([0xffff, 0x8000, 0, 0x8000]));
        assert_eq!(img.rgba16(0, 0), [0x8000, 0x4000, 0, 0x8000]);
    }

    #[test]
    fn test_transparent_pixel_reads_zero() {
        let img = Rgba16Image::from_pixel(1, 1, Rgba([0xffff, 0xffff, 0xffff, 0]));
        assert_eq!(img.rgba16(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_sub_grid_reads_through_to_source() {
        let img = gradient_image(20, 10);
        let view = img.sub_grid(Rectangle::new((5, 2), (15, 8))).unwrap();
        assert_eq!(view.extent(), (10, 6));
        assert_eq!(view.rgba16(0, 0), img.rgba16(5, 2));
        assert_eq!(view.rgba16(9, 5), img.rgba16(14, 7));
    }

    #[test]
    fn test_sub_grid_clips_to_bounds() {
        let img = gradient_image(20, 10);
        let view = img.sub_grid(Rectangle::new((-5, 4), (30, 12))).unwrap();
        assert_eq!(view.extent(), (20, 6));
        assert_eq!(view.rgba16(0, 0), img.rgba16(0, 4));
    }

    #[test]
    fn test_sub_grid_rejects_empty_rectangle() {
        let img = gradient_image(20, 10);
        let err = img.sub_grid(Rectangle::new((10, 5), (10, 8))).unwrap_err();
        assert!(matches!(err, OffimgError::Geometry(_)));

        let err = img.sub_grid(Rectangle::new((15, 8), (5, 2))).unwrap_err();
        assert!(matches!(err, OffimgError::Geometry(_)));
    }

    #[test]
    fn test_sub_grid_rejects_disjoint_rectangle() {
        let img = gradient_image(20, 10);
        let err = img.sub_grid(Rectangle::new((50, 50), (60, 60))).unwrap_err();
        assert!(err.to_string().contains("outside the 20x10 image"));
    }

    #[test]
    fn test_nested_sub_grid() {
        let img = gradient_image(20, 10);
        let outer = img.sub_grid(Rectangle::new((4, 2), (16, 10))).unwrap();
        let inner = outer.sub_grid(Rectangle::new((1, 1), (3, 3))).unwrap();
        assert_eq!(inner.extent(), (2, 2));
        assert_eq!(inner.rgba16(0, 0), img.rgba16(5, 3));
        assert_eq!(inner.offsets(), (1, 1));
    }

    #[test]
    fn test_view_is_a_generic_image() {
        let img = gradient_image(20, 10);
        let view = img.sub_grid(Rectangle::new((2, 3), (6, 5))).unwrap();
        assert_eq!(view.offsets(), (2, 3));
        assert_eq!(GenericImageView::dimensions(&view), (4, 2));
        assert_eq!(view.get_pixel(1, 1), *img.get_pixel(3, 4));

        let copied: Vec<_> = view.pixels().collect();
        assert_eq!(copied.len(), 8);
        assert_eq!(copied[0], (0, 0, *img.get_pixel(2, 3)));
    }
}
