use itertools::iproduct;
use tracing::{instrument, trace};

use crate::{map::MapData, palette::Palette, palette::PaletteLayout, texture::Texture};

/// Width and height of [`THRESHOLDS`]
pub const MATRIX_SIZE: u32 = 16;

/// 16x16 ordered dither threshold matrix, row-major, values in `[0, 1)`
#[rustfmt::skip]
#[allow(clippy::excessive_precision, clippy::unreadable_literal)]
pub const THRESHOLDS: [f32; (MATRIX_SIZE * MATRIX_SIZE) as usize] = [
    0.0, 0.5, 0.125, 0.625, 0.03125, 0.53125, 0.15625, 0.65625, 0.0078125, 0.507812, 0.132812, 0.632812, 0.0390625, 0.539062, 0.164062, 0.664062,
    0.75, 0.25, 0.875, 0.375, 0.78125, 0.28125, 0.90625, 0.40625, 0.757812, 0.257812, 0.882812, 0.382812, 0.789062, 0.289062, 0.914062, 0.414062,
    0.1875, 0.6875, 0.0625, 0.5625, 0.21875, 0.71875, 0.09375, 0.59375, 0.195312, 0.695312, 0.0703125, 0.570312, 0.226562, 0.726562, 0.101562, 0.601562,
    0.9375, 0.4375, 0.8125, 0.3125, 0.96875, 0.46875, 0.84375, 0.34375, 0.945312, 0.445312, 0.820312, 0.320312, 0.976562, 0.476562, 0.851562, 0.351562,
    0.046875, 0.546875, 0.171875, 0.671875, 0.015625, 0.515625, 0.140625, 0.640625, 0.0546875, 0.554688, 0.179688, 0.679688, 0.0234375, 0.523438, 0.148438, 0.648438,
    0.796875, 0.296875, 0.921875, 0.421875, 0.765625, 0.265625, 0.890625, 0.390625, 0.804688, 0.304688, 0.929688, 0.429688, 0.773438, 0.273438, 0.898438, 0.398438,
    0.234375, 0.734375, 0.109375, 0.609375, 0.203125, 0.703125, 0.078125, 0.578125, 0.242188, 0.742188, 0.117188, 0.617188, 0.210938, 0.710938, 0.0859375, 0.585938,
    0.984375, 0.484375, 0.859375, 0.359375, 0.953125, 0.453125, 0.828125, 0.328125, 0.992188, 0.492188, 0.867188, 0.367188, 0.960938, 0.460938, 0.835938, 0.335938,
    0.0117188, 0.511719, 0.136719, 0.636719, 0.0429688, 0.542969, 0.167969, 0.667969, 0.00390625, 0.503906, 0.128906, 0.628906, 0.0351562, 0.535156, 0.160156, 0.660156,
    0.761719, 0.261719, 0.886719, 0.386719, 0.792969, 0.292969, 0.917969, 0.417969, 0.753906, 0.253906, 0.878906, 0.378906, 0.785156, 0.285156, 0.910156, 0.410156,
    0.199219, 0.699219, 0.0742188, 0.574219, 0.230469, 0.730469, 0.105469, 0.605469, 0.191406, 0.691406, 0.0664062, 0.566406, 0.222656, 0.722656, 0.0976562, 0.597656,
    0.949219, 0.449219, 0.824219, 0.324219, 0.980469, 0.480469, 0.855469, 0.355469, 0.941406, 0.441406, 0.816406, 0.316406, 0.972656, 0.472656, 0.847656, 0.347656,
    0.0585938, 0.558594, 0.183594, 0.683594, 0.0273438, 0.527344, 0.152344, 0.652344, 0.0507812, 0.550781, 0.175781, 0.675781, 0.0195312, 0.519531, 0.144531, 0.644531,
    0.808594, 0.308594, 0.933594, 0.433594, 0.777344, 0.277344, 0.902344, 0.402344, 0.800781, 0.300781, 0.925781, 0.425781, 0.769531, 0.269531, 0.894531, 0.394531,
    0.246094, 0.746094, 0.121094, 0.621094, 0.214844, 0.714844, 0.0898438, 0.589844, 0.238281, 0.738281, 0.113281, 0.613281, 0.207031, 0.707031, 0.0820312, 0.582031,
    0.996094, 0.496094, 0.871094, 0.371094, 0.964844, 0.464844, 0.839844, 0.339844, 0.988281, 0.488281, 0.863281, 0.363281, 0.957031, 0.457031, 0.832031, 0.332031,
];

/// Amplitude of the color perturbation, one eighth of the channel range
const COLOR_SPREAD: f32 = 255.0 / 8.0;

/// Returns the threshold for pixel `(x, y)`, tiling the matrix over the image
#[must_use]
pub fn threshold(x: u32, y: u32) -> f32 {
    THRESHOLDS[((y % MATRIX_SIZE) * MATRIX_SIZE + x % MATRIX_SIZE) as usize]
}

/// Quantizes `texture` with ordered dithering
///
/// Each pixel is handled on its own: alpha is reduced to on/off against the threshold, and
/// opaque pixels are shifted by a threshold-dependent offset before the nearest palette entry
/// is looked up. The texture is not modified.
///
/// # Panics
///
/// Panics if [`Palette::ensure_searchable`] fails for `palette`
#[must_use]
#[instrument(skip_all, fields(width = texture.width(), height = texture.height()))]
#[allow(clippy::cast_possible_truncation)]
pub fn ordered(texture: &Texture, palette: &Palette) -> MapData {
    let (width, height) = (texture.width(), texture.height());
    let indices = iproduct!(0..height, 0..width)
        .zip(texture.pixels())
        .map(|((y, x), pixel)| {
            let t = threshold(x, y);
            let alpha = ((pixel.a as f32 + 255.0 * (t - 0.5)) / 255.0).round() as i32;
            // the rounded value is -1 rather than 0 for a transparent source at t = 0
            if pixel.a == 0 || alpha == 0 {
                return PaletteLayout::TRANSPARENT_INDEX;
            }
            let offset = (COLOR_SPREAD * (t - 0.5)) as i32;
            palette.nearest_index(pixel.rgb().offset(offset))
        })
        .collect::<Vec<_>>();
    trace!("quantized {} pixels", indices.len());
    MapData::from_parts(width, height, indices)
}
