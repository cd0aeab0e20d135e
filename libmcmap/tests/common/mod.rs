#![allow(dead_code)]

use std::{fs, path::Path};

use image::{Rgba, RgbaImage};

/// Black (reserved), red, blue
pub const PALETTE_TEXT: &str = "\"0,0,0\"\n\"255,0,0\"\n\"0,0,255\"\n";

/// Index of full-strength red in [`PALETTE_TEXT`]
pub const RED: u8 = 6;
/// Index of full-strength blue in [`PALETTE_TEXT`]
pub const BLUE: u8 = 10;

/// Writes [`PALETTE_TEXT`] to `path`
pub fn write_palette(path: &Path) -> std::io::Result<()> {
    fs::write(path, PALETTE_TEXT)
}

/// A 64x32 opaque image, red on the left half and blue on the right
pub fn red_blue_image() -> RgbaImage {
    RgbaImage::from_fn(64, 32, |x, _| {
        if x < 32 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}
