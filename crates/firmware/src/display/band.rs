//! `DrawTarget` over one band buffer.
//!
//! Drawing uses screen coordinates; anything outside the band's [`Area`] is
//! clipped. Pixels are stored row-major, tightly packed, big-endian RGB565,
//! which is the byte order ST7796-class panels expect on the wire.

// Offsets are computed from u16 area extents after clipping, so every index
// is non-negative and below the band length checked in `new`.
#![allow(
    clippy::arithmetic_side_effects,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use platform::{Area, DisplayError};

/// One band of the screen backed by a pool buffer.
pub struct BandTarget<'b> {
    buf: &'b mut [u8],
    area: Area,
    bounds: Rectangle,
}

impl<'b> BandTarget<'b> {
    /// Wrap `buf` as the pixels of `area`.
    ///
    /// Fails with [`DisplayError::InvalidBuffer`] if `buf` is shorter than
    /// the area needs.
    pub fn new(buf: &'b mut [u8], area: Area) -> Result<Self, DisplayError> {
        let len = area.byte_len();
        let buf = buf.get_mut(..len).ok_or(DisplayError::InvalidBuffer)?;
        Ok(Self {
            buf,
            area,
            bounds: area.to_rectangle(),
        })
    }

    /// Area this band covers.
    pub fn area(&self) -> Area {
        self.area
    }

    /// Raw band bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &*self.buf
    }

    fn offset(&self, p: Point) -> usize {
        let col = (p.x - i32::from(self.area.x1)) as usize;
        let row = (p.y - i32::from(self.area.y1)) as usize;
        (row * self.area.width() as usize + col) * 2
    }

    fn put(&mut self, p: Point, color: Rgb565) {
        let at = self.offset(p);
        if let Some(px) = self.buf.get_mut(at..at + 2) {
            px.copy_from_slice(&color.into_storage().to_be_bytes());
        }
    }
}

impl Dimensions for BandTarget<'_> {
    fn bounding_box(&self) -> Rectangle {
        self.bounds
    }
}

impl DrawTarget for BandTarget<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if self.bounds.contains(p) {
                self.put(p, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounds);
        let Some(bottom_right) = clipped.bottom_right() else {
            return Ok(());
        };
        let bytes = color.into_storage().to_be_bytes();
        for y in clipped.top_left.y..=bottom_right.y {
            let start = self.offset(Point::new(clipped.top_left.x, y));
            let end = start + clipped.size.width as usize * 2;
            if let Some(row) = self.buf.get_mut(start..end) {
                for px in row.chunks_exact_mut(2) {
                    px.copy_from_slice(&bytes);
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let bytes = color.into_storage().to_be_bytes();
        for px in self.buf.chunks_exact_mut(2) {
            px.copy_from_slice(&bytes);
        }
        Ok(())
    }
}
