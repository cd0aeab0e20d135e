use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use libmcmap::{
    convert::{image_to_map, map_to_image},
    ConvertOptions, Palette,
};
use tracing::{debug, info, instrument};

/// Name of the palette file looked up next to the executable
pub const DEFAULT_PALETTE_NAME: &str = "colours.csv";

/// Which way a file is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Quantize an image into a map file
    ImageToMap,
    /// Render a map file as a PNG
    MapToImage,
}

impl Direction {
    /// Files with an extension the `image` crate knows are images, anything else is a map
    #[must_use]
    pub fn infer(path: &Path) -> Self {
        if ImageFormat::from_path(path).is_ok() {
            Self::ImageToMap
        } else {
            Self::MapToImage
        }
    }
}

/// Derives where the result of converting `input` is written
///
/// Images become `<stem>_map`, maps become `<stem>.png`. The output lands in `output_dir` if
/// given, otherwise next to the input.
///
/// # Errors
///
/// This function errors if `input` has no usable file name
pub fn output_path_for(
    input: &Path,
    direction: Direction,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let Some(Some(stem)) = input.file_stem().map(|os| os.to_str()) else {
        bail!("Invalid file name: {}", input.display());
    };
    let dir = match output_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or_else(|| Path::new("")),
    };
    let name = match direction {
        Direction::ImageToMap => format!("{stem}_map"),
        Direction::MapToImage => format!("{stem}.png"),
    };
    Ok(dir.join(name))
}

/// The palette file next to the running executable
#[must_use]
pub fn default_palette_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_PALETTE_NAME)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PALETTE_NAME))
}

/// Loads the palette and checks it can be used for conversion
///
/// # Errors
///
/// This function errors if the palette file cannot be read or parsed, or is too small to search
#[instrument]
pub fn load_palette(path: &Path) -> Result<Palette> {
    let palette = Palette::from_file(path)
        .with_context(|| format!("Failed to load palette from {}", path.display()))?;
    palette
        .ensure_searchable()
        .with_context(|| format!("Unusable palette in {}", path.display()))?;
    info!("Loaded {} palette entries", palette.len());
    Ok(palette)
}

/// Converts a single file in whichever direction its name suggests
///
/// Returns the path that was written.
///
/// # Errors
///
/// This function errors if the output path cannot be derived or the conversion fails
#[instrument(skip(palette))]
pub fn convert_file(
    input: &Path,
    palette: &Palette,
    options: &ConvertOptions,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let direction = Direction::infer(input);
    let output = output_path_for(input, direction, output_dir)?;
    debug!("{direction:?}: {} -> {}", input.display(), output.display());
    match direction {
        Direction::ImageToMap => {
            image_to_map(input, &output, palette, options)?;
        }
        Direction::MapToImage => {
            map_to_image(input, &output, palette, options)?;
        }
    }
    Ok(output)
}
