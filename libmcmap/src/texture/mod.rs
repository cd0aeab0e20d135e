#![allow(clippy::module_name_repetitions)]

mod resize;
mod sample;

pub use sample::{Sampling, Wrapping};

use std::{io::Cursor, path::Path};

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, info, instrument};

use crate::{color::Rgba, write::write_atomically, Error, Result};

/// An owned RGBA raster
///
/// The pixel vector always holds exactly `width * height` entries; operations that change the
/// dimensions replace both at once.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Default for Texture {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Texture {
    /// Creates a new [`Texture`] filled with opaque black
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::OPAQUE_BLACK)
    }

    /// Creates a new [`Texture`] where every pixel is `color`
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; pixel_count(width, height)],
        }
    }

    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<Rgba>) -> Self {
        debug_assert_eq!(pixel_count(width, height), pixels.len());
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Creates a [`Texture`] from interleaved 8-bit RGBA data
    ///
    /// # Errors
    ///
    /// This function errors if `data` does not hold exactly `width * height * 4` bytes
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if data.len() != pixel_count(width, height) * 4 {
            return Err(Error::MismatchWidthHeight {
                width_height: (width, height),
                raster_length: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|p| Rgba::from([p[0], p[1], p[2], p[3]]))
            .collect();
        Ok(Self::from_parts(width, height, pixels))
    }

    /// Decodes the image at `path` into a [`Texture`]
    ///
    /// # Errors
    ///
    /// This function errors if the file cannot be opened or decoded
    #[instrument]
    pub fn open<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| Error::Decode {
            path: path.to_owned(),
            source,
        })?;
        debug!("Decoded {}x{} image", img.width(), img.height());
        Ok(Self::from(&img.to_rgba8()))
    }

    /// Encodes [`Self`] and writes it to `path`
    ///
    /// The format is inferred from the file extension. Formats without an alpha channel receive
    /// the RGB channels only.
    ///
    /// # Errors
    ///
    /// This function errors if the format is not supported or the file cannot be written
    #[instrument(skip(self), fields(width = self.width, height = self.height))]
    pub fn save<P: AsRef<Path> + std::fmt::Debug>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format =
            ImageFormat::from_path(path).map_err(|_| Error::UnsupportedFormat(path.to_owned()))?;
        let bytes = self.encode(format).map_err(|source| Error::Encode {
            path: path.to_owned(),
            source,
        })?;
        write_atomically(path, &bytes)?;
        info!("Wrote {format:?} image to {}", path.display());
        Ok(())
    }

    /// Encodes [`Self`] in memory using the given image format
    ///
    /// # Errors
    ///
    /// This function errors if the codec rejects the image
    pub fn encode(&self, format: ImageFormat) -> image::ImageResult<Vec<u8>> {
        let img = DynamicImage::ImageRgba8(self.to_image());
        let img = match format {
            ImageFormat::Pnm | ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            _ => img,
        };
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format)?;
        Ok(out.into_inner())
    }

    /// Returns the pixels as interleaved 8-bit RGBA data, clamping each channel to `0..=255`
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba8()).collect()
    }

    /// Returns the pixels as an [`RgbaImage`]
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixels[self.index(x, y)].to_rgba8())
        })
    }

    /// Returns the width of the texture
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixels in row-major order
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or [`None`] if it lies outside the texture
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.in_bounds(x, y).then(|| self.pixels[self.index(x, y)])
    }

    /// Sets the pixel at `(x, y)`
    ///
    /// Writes outside the texture are discarded.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if self.in_bounds(x, y) {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    /// Sets the alpha channel of the pixel at `(x, y)`, leaving its color untouched
    ///
    /// Writes outside the texture are discarded.
    pub fn set_alpha(&mut self, x: u32, y: u32, alpha: i32) {
        if self.in_bounds(x, y) {
            let i = self.index(x, y);
            self.pixels[i].a = alpha;
        }
    }

    const fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl From<&RgbaImage> for Texture {
    fn from(img: &RgbaImage) -> Self {
        let pixels = img.pixels().map(|p| Rgba::from(p.0)).collect();
        Self::from_parts(img.width(), img.height(), pixels)
    }
}

const fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
