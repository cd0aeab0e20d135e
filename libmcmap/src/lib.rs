//! # libmcmap
//!
//!
//! This library provides datatypes and i/o functionality for palette-indexed map art: a fixed-size
//! grid (128×128 by default) where every cell holds a one-byte index into a tiered color palette.
//!
//! It converts a full-color raster image into such a grid and back. The interesting part is the
//! quantization step: the source image is fitted onto the map canvas and every pixel is mapped
//! onto the nearest palette shade, using either ordered dithering or Floyd-Steinberg error
//! diffusion to hide banding.
//!
//! ### The palette
//!
//! A palette is built from a list of base colors. Every base color expands to four shades
//! (see [`PaletteLayout::STANDARD`]) and the first four slots of the resulting table are reserved:
//! they never hold a color and any cell referencing them is transparent.
//!
//! ### The map file
//!
//! Map files have no header. They hold exactly `width * height` bytes in row-major order, one
//! palette index per byte. Since the dimensions are not stored in the file, the caller must
//! supply them when reading it back (see [`MapData::from_file`]).
//!
//! ### Usage
//!
//! #### Converting an image to a map file
//!
//! ```rust,no_run
//! use std::path::Path;
//! use libmcmap::{convert::image_to_map, ConvertOptions, DitherMethod, Palette};
//!
//! fn main() -> Result<(), libmcmap::Error> {
//!     let palette = Palette::from_file("colours.csv")?;
//!     let options = ConvertOptions::builder()
//!         .dither(DitherMethod::Ordered)
//!         .build();
//!
//!     image_to_map(
//!         Path::new("sunset.png"),
//!         Path::new("sunset_map"),
//!         &palette,
//!         &options,
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! #### Converting a map file back to an image
//!
//! ```rust,no_run
//! use std::path::Path;
//! use libmcmap::{convert::map_to_image, ConvertOptions, Palette};
//!
//! fn main() -> Result<(), libmcmap::Error> {
//!     let palette = Palette::from_file("colours.csv")?;
//!     map_to_image(
//!         Path::new("sunset_map"),
//!         Path::new("sunset.png"),
//!         &palette,
//!         &ConvertOptions::default(),
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! #### Working on buffers directly
//!
//! All file-level helpers are thin wrappers around in-memory types, which can be used on their
//! own:
//!
//! ```rust
//! use libmcmap::{dither, DitherMethod, Palette, Rgb, Rgba, Texture};
//!
//! // the first base color only fills the reserved transparent slots
//! let palette = Palette::build(&[Rgb::new(0, 0, 0), Rgb::new(255, 0, 0)]).unwrap();
//! let mut texture = Texture::filled(4, 4, Rgba::new(255, 0, 0, 255));
//!
//! let map = dither::dither(&mut texture, &palette, DitherMethod::FloydSteinberg).unwrap();
//! assert!(map.indices().iter().all(|&i| i == 6));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

/// RGB and RGBA values at working precision
pub mod color;
/// Image <-> map conversion pipelines
pub mod convert;
/// Ordered and error-diffusion quantization
pub mod dither;
mod error;
/// Indexed map grid and its binary file codec
pub mod map;
/// Tiered palette table and palette file parsing
pub mod palette;
/// RGBA pixel buffer with sampling and resizing
pub mod texture;
mod write;

pub use color::{Rgb, Rgba};
pub use convert::ConvertOptions;
pub use dither::DitherMethod;
pub use error::{Error, Result};
pub use map::MapData;
pub use palette::{Palette, PaletteLayout};
pub use texture::{Sampling, Texture, Wrapping};

/// Default map width in cells
pub const DEFAULT_WIDTH: u32 = 128;
/// Default map height in cells
pub const DEFAULT_HEIGHT: u32 = 128;
