//! Bitmaps compiled into the binary.
//!
//! Both assets are 1 bit per pixel, rows padded to a whole byte, most
//! significant bit first. Set bits are painted with the tint color and
//! cleared bits are left untouched.

use embedded_graphics::{image::ImageRaw, pixelcolor::BinaryColor};

const SQUIRCLE_WIDTH: u32 = 18;

#[rustfmt::skip]
static SQUIRCLE_DATA: [u8; 54] = [
    0b00011111, 0b11111110, 0b00000000,
    0b01111111, 0b11111111, 0b10000000,
    0b01111111, 0b11111111, 0b10000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b11111111, 0b11111111, 0b11000000,
    0b01111111, 0b11111111, 0b10000000,
    0b01111111, 0b11111111, 0b10000000,
    0b00011111, 0b11111110, 0b00000000,
];

const DOT_WIDTH: u32 = 3;

#[rustfmt::skip]
static DOT_DATA: [u8; 3] = [
    0b11100000,
    0b11100000,
    0b11100000,
];

/// Rounded square placed under the current day
pub fn squircle() -> ImageRaw<'static, BinaryColor> {
    ImageRaw::new(&SQUIRCLE_DATA, SQUIRCLE_WIDTH)
}

/// Single event marker
pub fn dot() -> ImageRaw<'static, BinaryColor> {
    ImageRaw::new(&DOT_DATA, DOT_WIDTH)
}

#[cfg(test)]
mod test {
    use embedded_graphics::prelude::*;

    use super::{dot, squircle};

    #[test]
    fn asset_sizes() {
        assert_eq!(squircle().size(), Size::new(18, 18));
        assert_eq!(dot().size(), Size::new(3, 3));
    }
}
