use strum::{Display, EnumString};

use super::Texture;
use crate::color::Rgba;

/// How a continuous coordinate is turned into a color
#[derive(Default, Debug, Eq, PartialEq, Copy, Clone, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Sampling {
    /// Truncate to the containing cell, no interpolation
    #[default]
    Point,
    /// Four-tap bilinear interpolation
    Bilinear,
}

/// How coordinates outside the texture are brought back inside
#[derive(Default, Debug, Eq, PartialEq, Copy, Clone, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Wrapping {
    /// Clamp the coordinate to `[0, dim - 1]`
    #[default]
    Clamp,
    /// Take the coordinate modulo the dimension
    Repeat,
}

impl Texture {
    /// Samples the texture at a continuous coordinate
    ///
    /// With [`Sampling::Bilinear`] the upper tap is clamped to the last row/column even under
    /// [`Wrapping::Repeat`], so the right and bottom edges never blend with the opposite side.
    ///
    /// An empty texture always yields [`Rgba::TRANSPARENT`].
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn sample(&self, x: f32, y: f32, sampling: Sampling, wrapping: Wrapping) -> Rgba {
        if self.pixels.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let (width, height) = (self.width as f32, self.height as f32);
        let (x, y) = match wrapping {
            Wrapping::Clamp => (x.clamp(0.0, width - 1.0), y.clamp(0.0, height - 1.0)),
            Wrapping::Repeat => (repeat(x, width), repeat(y, height)),
        };

        // both coordinates are non-negative here, so the cast is a floor
        let min_x = (x as u32).min(self.width - 1);
        let min_y = (y as u32).min(self.height - 1);

        match sampling {
            Sampling::Point => self.pixels[self.index(min_x, min_y)],
            Sampling::Bilinear => {
                let max_x = (min_x + 1).min(self.width - 1);
                let max_y = (min_y + 1).min(self.height - 1);
                let lerp_x = x - min_x as f32;
                let lerp_y = y - min_y as f32;

                let at = |x, y| self.pixels[self.index(x, y)];
                let top = Rgba::lerp(at(min_x, min_y), at(max_x, min_y), lerp_x);
                let bottom = Rgba::lerp(at(min_x, max_y), at(max_x, max_y), lerp_x);
                Rgba::lerp(top, bottom, lerp_y)
            }
        }
    }
}

fn repeat(v: f32, dim: f32) -> f32 {
    let v = v % dim;
    if v < 0.0 {
        v + dim
    } else {
        v
    }
}
