//! Drawing surfaces used by the renderer besides the display itself

use alloc::{vec, vec::Vec};
use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

/// In-memory image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster<C> {
    size: Size,
    pixels: Vec<C>,
}

impl<C: PixelColor> Raster<C> {
    /// Blank image filled with `background`
    pub fn new(width: u32, height: u32, background: C) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![background; width as usize * height as usize],
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        if x < self.size.width && y < self.size.height {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn pixel(&self, point: Point) -> Option<C> {
        self.index(point).map(|idx| self.pixels[idx])
    }

    /// Row-major pixel data
    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }
}

impl<C: PixelColor> OriginDimensions for Raster<C> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<C: PixelColor> DrawTarget for Raster<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point) {
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

/// Draws 1 bit images onto `target`, painting set pixels with `tint` and
/// leaving the rest untouched
pub struct Tinted<'a, D: DrawTarget> {
    target: &'a mut D,
    tint: D::Color,
}

impl<'a, D: DrawTarget> Tinted<'a, D> {
    pub fn new(target: &'a mut D, tint: D::Color) -> Self {
        Self { target, tint }
    }
}

impl<D: DrawTarget> Dimensions for Tinted<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D: DrawTarget> DrawTarget for Tinted<'_, D> {
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let tint = self.tint;
        self.target.draw_iter(
            pixels
                .into_iter()
                .filter(|Pixel(_, color)| color.is_on())
                .map(|Pixel(point, _)| Pixel(point, tint)),
        )
    }
}
