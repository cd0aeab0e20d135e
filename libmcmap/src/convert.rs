use std::path::Path;

use bon::Builder;
use strum::Display;
use tracing::{debug, info, instrument};

use crate::{
    color::Rgba,
    dither::{dither, DitherMethod},
    map::MapData,
    palette::Palette,
    texture::Texture,
    Error, Result, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};

/// Settings shared by both conversion directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct ConvertOptions {
    /// Dithering used when quantizing an image
    #[builder(default)]
    pub dither: DitherMethod,
    /// Map width in cells
    #[builder(default = DEFAULT_WIDTH)]
    pub width: u32,
    /// Map height in cells
    #[builder(default = DEFAULT_HEIGHT)]
    pub height: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Steps of an image to map conversion, as they appear in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
enum Stage {
    Load,
    ScaleToTarget,
    Quantize,
    Emit,
}

/// Scales `texture` to fit inside `width` x `height` and centers it on a canvas of that size
///
/// The aspect ratio is kept; the uncovered part of the canvas is transparent.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn fit_to_canvas(texture: &mut Texture, width: u32, height: u32) {
    let (src_width, src_height) = (texture.width() as f32, texture.height() as f32);
    let scale = (width as f32 / src_width).min(height as f32 / src_height);
    debug!("Fit scale: {scale}");
    texture.resize((src_width * scale) as u32, (src_height * scale) as u32);
    texture.resize_canvas(width, height);
}

/// Fits `texture` onto the map canvas and quantizes it
///
/// # Errors
///
/// This function errors if the texture is empty or the palette cannot be searched
pub fn texture_to_map(
    mut texture: Texture,
    palette: &Palette,
    options: &ConvertOptions,
) -> Result<MapData> {
    if texture.width() == 0 || texture.height() == 0 {
        return Err(Error::EmptyImage {
            width: texture.width(),
            height: texture.height(),
        });
    }
    debug!(stage = %Stage::ScaleToTarget);
    fit_to_canvas(&mut texture, options.width, options.height);
    debug!(stage = %Stage::Quantize, method = %options.dither);
    dither(&mut texture, palette, options.dither)
}

/// Looks up the palette color of every map cell
///
/// Cells in the reserved range become fully transparent, every other cell is opaque.
///
/// # Errors
///
/// This function errors if a cell references an entry that does not exist in `palette`
pub fn map_to_texture(map: &MapData, palette: &Palette) -> Result<Texture> {
    let layout = palette.layout();
    let pixels = map
        .indices()
        .iter()
        .map(|&index| {
            if layout.is_transparent(index) {
                return Ok(Rgba::TRANSPARENT);
            }
            palette
                .get(index)
                .map(|color| Rgba::from_rgb(color, 255))
                .ok_or(Error::IndexOutOfRange {
                    index,
                    palette_len: palette.len(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Texture::from_parts(map.width(), map.height(), pixels))
}

/// Converts an image file into a map file
///
/// Returns the map that was written.
///
/// # Errors
///
/// This function errors if the image cannot be decoded, the palette cannot be searched or the
/// map file cannot be written. Nothing is written on error.
#[instrument(skip(palette))]
pub fn image_to_map(
    image_file: &Path,
    output_name: &Path,
    palette: &Palette,
    options: &ConvertOptions,
) -> Result<MapData> {
    debug!(stage = %Stage::Load);
    let texture = Texture::open(image_file)?;
    info!(
        "Read {}x{} image from {}",
        texture.width(),
        texture.height(),
        image_file.display()
    );

    let map = texture_to_map(texture, palette, options)?;

    debug!(stage = %Stage::Emit);
    map.to_file(output_name)?;
    info!("Successfully wrote map to {}", output_name.display());
    Ok(map)
}

/// Converts a map file into an image file
///
/// The map dimensions come from `options`, the image format from the extension of
/// `output_name`. Returns the image that was written.
///
/// # Errors
///
/// This function errors if the map cannot be read, references a missing palette entry, or the
/// image cannot be encoded and written. Nothing is written on error.
#[instrument(skip(palette))]
pub fn map_to_image(
    map_file: &Path,
    output_name: &Path,
    palette: &Palette,
    options: &ConvertOptions,
) -> Result<Texture> {
    let map = MapData::from_file(map_file, options.width, options.height)?;
    debug!("Read map from {}", map_file.display());

    let texture = map_to_texture(&map, palette)?;
    texture.save(output_name)?;
    info!("Successfully wrote image to {}", output_name.display());
    Ok(texture)
}
