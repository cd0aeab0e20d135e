//! Two interchangeable strategies map an RGBA [`Texture`] onto a [`Palette`]:
//!
//! - **Ordered**: every pixel is compared against a fixed 16x16 threshold matrix. Stateless and
//!   deterministic; the texture is left as is.
//! - **Floyd-Steinberg**: quantization error is pushed into the neighbors that have not been
//!   visited yet. Sequential by nature; the texture is modified in place.
//!
//! Both reduce alpha to on/off first. Pixels that end up transparent are written as
//! [`PaletteLayout::TRANSPARENT_INDEX`](crate::PaletteLayout::TRANSPARENT_INDEX) and skip the
//! color search.

mod diffusion;
mod ordered;

pub use diffusion::{floyd_steinberg, Kernel, FLOYD_STEINBERG};
pub use ordered::{ordered, threshold, MATRIX_SIZE, THRESHOLDS};

use strum::{Display, EnumIter, EnumString};
use tracing::{debug, instrument};

use crate::{map::MapData, palette::Palette, texture::Texture, Result};

/// Dither algorithm selection
#[derive(Default, Debug, Eq, PartialEq, Copy, Clone, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum DitherMethod {
    /// Threshold matrix dithering
    Ordered,
    /// Floyd-Steinberg error diffusion
    #[default]
    FloydSteinberg,
}

/// Quantizes `texture` onto `palette` with the given method
///
/// [`DitherMethod::FloydSteinberg`] leaves the accumulated error in `texture`.
///
/// # Errors
///
/// This function errors if the palette cannot be searched (see [`Palette::ensure_searchable`])
#[instrument(skip(texture, palette), fields(width = texture.width(), height = texture.height()))]
pub fn dither(texture: &mut Texture, palette: &Palette, method: DitherMethod) -> Result<MapData> {
    palette.ensure_searchable()?;
    let map = match method {
        DitherMethod::Ordered => ordered(texture, palette),
        DitherMethod::FloydSteinberg => floyd_steinberg(texture, palette),
    };
    let layout = palette.layout();
    debug!(
        "{} of {} cells transparent",
        map.indices()
            .iter()
            .filter(|&&i| layout.is_transparent(i))
            .count(),
        map.indices().len()
    );
    Ok(map)
}
