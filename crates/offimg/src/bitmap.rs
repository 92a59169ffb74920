//! 1 bit-per-pixel BMP encoder for the device display.
//!
//! File layout: 14-byte file header, 40-byte info header, a two-entry
//! palette (white, black), then scanlines stored bottom-up and padded to
//! 4 bytes. The whole file is padded with zeros to a multiple of 8 bytes,
//! which the display loader requires; the padding is counted in both the
//! file size and the image size fields.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use crate::grid::{PixelGrid, Rgba16};
use crate::{HEIGHT, OffimgError, Result, WIDTH};

/// Resolution written to the info header, taken from a sample image the
/// display firmware accepts.
const PIXELS_PER_METER: u32 = 2834;

/// Alignment of the whole file expected by the display loader.
const FILE_ALIGNMENT: u32 = 8;

/// BITMAPFILEHEADER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub bf_type: [u8; 2],
    pub bf_size: u32,
    pub bf_reserved1: u16,
    pub bf_reserved2: u16,
    pub bf_off_bits: u32,
}

impl BitmapFileHeader {
    pub const SIZE: u32 = 14;

    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.bf_type)?;
        w.write_u32::<LittleEndian>(self.bf_size)?;
        w.write_u16::<LittleEndian>(self.bf_reserved1)?;
        w.write_u16::<LittleEndian>(self.bf_reserved2)?;
        w.write_u32::<LittleEndian>(self.bf_off_bits)
    }
}

/// BITMAPINFOHEADER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub bi_size: u32,
    pub bi_width: u32,
    pub bi_height: u32,
    pub bi_planes: u16,
    pub bi_bit_count: u16,
    pub bi_compression: u32,
    pub bi_size_image: u32,
    pub bi_x_pels_per_meter: u32,
    pub bi_y_pels_per_meter: u32,
    pub bi_clr_used: u32,
    pub bi_clr_important: u32,
}

impl BitmapInfoHeader {
    pub const SIZE: u32 = 40;

    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.bi_size)?;
        w.write_u32::<LittleEndian>(self.bi_width)?;
        w.write_u32::<LittleEndian>(self.bi_height)?;
        w.write_u16::<LittleEndian>(self.bi_planes)?;
        w.write_u16::<LittleEndian>(self.bi_bit_count)?;
        w.write_u32::<LittleEndian>(self.bi_compression)?;
        w.write_u32::<LittleEndian>(self.bi_size_image)?;
        w.write_u32::<LittleEndian>(self.bi_x_pels_per_meter)?;
        w.write_u32::<LittleEndian>(self.bi_y_pels_per_meter)?;
        w.write_u32::<LittleEndian>(self.bi_clr_used)?;
        w.write_u32::<LittleEndian>(self.bi_clr_important)
    }
}

/// A palette entry, stored blue first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbQuad {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl RgbQuad {
    pub const SIZE: u32 = 4;

    pub const WHITE: RgbQuad = RgbQuad {
        blue: 255,
        green: 255,
        red: 255,
        reserved: 0,
    };

    pub const BLACK: RgbQuad = RgbQuad {
        blue: 0,
        green: 0,
        red: 0,
        reserved: 0,
    };

    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&[self.blue, self.green, self.red, self.reserved])
    }
}

/// Bit 0 is white, bit 1 is black.
pub const PALETTE: [RgbQuad; 2] = [RgbQuad::WHITE, RgbQuad::BLACK];

/// Sizes and offsets derived from the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapLayout {
    pub width: u32,
    pub height: u32,
    /// Scanline stride, rounded up to 32 bits.
    pub bytes_per_line: u32,
    /// Scanline bytes without the trailing file padding.
    pub image_size: u32,
    /// Offset of the first scanline; headers plus palette.
    pub off_bits: u32,
    /// Zero bytes appended after the last scanline.
    pub padding: u32,
    /// Total file size including `padding`.
    pub file_size: u32,
}

impl BitmapLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_line = width.div_ceil(32) * 32 / 8;
        let image_size = bytes_per_line * height;
        let off_bits = BitmapFileHeader::SIZE
            + BitmapInfoHeader::SIZE
            + RgbQuad::SIZE * PALETTE.len() as u32;
        let unpadded = off_bits + image_size;
        let padding = unpadded.next_multiple_of(FILE_ALIGNMENT) - unpadded;

        Self {
            width,
            height,
            bytes_per_line,
            image_size,
            off_bits,
            padding,
            file_size: unpadded + padding,
        }
    }

    pub fn file_header(&self) -> BitmapFileHeader {
        BitmapFileHeader {
            bf_type: *b"BM",
            bf_size: self.file_size,
            bf_reserved1: 0,
            bf_reserved2: 0,
            bf_off_bits: self.off_bits,
        }
    }

    pub fn info_header(&self) -> BitmapInfoHeader {
        BitmapInfoHeader {
            bi_size: BitmapInfoHeader::SIZE,
            bi_width: self.width,
            bi_height: self.height,
            bi_planes: 1,
            bi_bit_count: 1,
            bi_compression: 0,
            bi_size_image: self.image_size + self.padding,
            bi_x_pels_per_meter: PIXELS_PER_METER,
            bi_y_pels_per_meter: PIXELS_PER_METER,
            bi_clr_used: 0,
            bi_clr_important: 0,
        }
    }
}

/// Whether a pixel maps to palette index 1.
///
/// A pixel is black when its mean channel value is below half its alpha, so
/// transparent pixels are always white.
pub fn is_black(pixel: Rgba16) -> bool {
    let [r, g, b, a] = pixel;
    (r + g + b) / 3 < a / 2
}

/// Pack row `y` of `grid` into `line`, most significant bit first.
fn pack_row<G: PixelGrid + ?Sized>(grid: &G, y: u32, width: u32, line: &mut [u8]) {
    line.fill(0);
    for x in 0..width {
        if is_black(grid.rgba16(x, y)) {
            line[(x / 8) as usize] |= 1 << (7 - x % 8);
        }
    }
}

/// Encode a 400×240 grid as a device bitmap into `w`.
///
/// Nothing is written when the dimensions are wrong. A failing sink can leave
/// a truncated stream behind; the sink is not flushed.
pub fn write_image<G, W>(grid: &G, w: &mut W) -> Result<()>
where
    G: PixelGrid + ?Sized,
    W: Write + ?Sized,
{
    let (width, height) = grid.extent();
    if width != WIDTH {
        return Err(OffimgError::Format {
            dimension: "width",
            actual: width,
            expected: WIDTH,
        });
    }
    if height != HEIGHT {
        return Err(OffimgError::Format {
            dimension: "height",
            actual: height,
            expected: HEIGHT,
        });
    }

    let layout = BitmapLayout::new(width, height);
    debug!(
        bytes_per_line = layout.bytes_per_line,
        image_size = layout.image_size,
        padding = layout.padding,
        file_size = layout.file_size,
        "Encoding monochrome bitmap"
    );

    layout.file_header().write_to(w)?;
    layout.info_header().write_to(w)?;
    for color in &PALETTE {
        color.write_to(w)?;
    }

    let mut line = vec![0u8; layout.bytes_per_line as usize];
    for y in (0..height).rev() {
        pack_row(grid, y, width, &mut line);
        w.write_all(&line)?;
    }

    w.write_all(&vec![0u8; layout.padding as usize])?;
    Ok(())
}
