use itertools::iproduct;
use tracing::{instrument, trace};

use crate::{
    color::{Rgb, Rgba},
    map::MapData,
    palette::{Palette, PaletteLayout},
    texture::Texture,
};

/// An error diffusion kernel
///
/// Each entry is `(dx, dy, weight)`; a neighbor receives `error * weight / divisor`.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries, all pointing at pixels not yet visited in raster order
    pub entries: &'static [(i32, i32, i32)],
    /// Total divisor for normalizing weights
    pub divisor: i32,
}

/// Floyd-Steinberg kernel, 100% error propagation
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};

/// Quantizes `texture` with Floyd-Steinberg error diffusion
///
/// Pixels are visited in raster order. Both the alpha error (against fully opaque or fully
/// transparent) and, for opaque pixels, the color error are pushed into `texture` at the
/// not-yet-visited neighbors, so the texture holds the accumulated error once this returns.
/// Neighbors outside the texture are skipped.
///
/// # Panics
///
/// Panics if [`Palette::ensure_searchable`] fails for `palette`
#[must_use]
#[instrument(skip_all, fields(width = texture.width(), height = texture.height()))]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn floyd_steinberg(texture: &mut Texture, palette: &Palette) -> MapData {
    let (width, height) = (texture.width(), texture.height());
    let mut indices = Vec::with_capacity(width as usize * height as usize);

    for (y, x) in iproduct!(0..height, 0..width) {
        let Some(pixel) = texture.get(x, y) else {
            continue;
        };

        let nearest_alpha = ((pixel.a as f32 / 255.0).round() * 255.0) as i32;
        diffuse_alpha(texture, x, y, pixel.a - nearest_alpha, &FLOYD_STEINBERG);

        if nearest_alpha == 0 {
            indices.push(PaletteLayout::TRANSPARENT_INDEX);
            continue;
        }

        let index = palette.nearest_index(pixel.rgb());
        indices.push(index);
        let chosen = palette.colors()[usize::from(index)];
        diffuse_color(texture, x, y, pixel.rgb() - chosen, &FLOYD_STEINBERG);
    }

    trace!("quantized {} pixels", indices.len());
    MapData::from_parts(width, height, indices)
}

/// Coordinates of the neighbor at `(dx, dy)`, if it lies inside the texture
fn neighbor(texture: &Texture, x: u32, y: u32, dx: i32, dy: i32) -> Option<(u32, u32, Rgba)> {
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    texture.get(nx, ny).map(|color| (nx, ny, color))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn diffuse_alpha(texture: &mut Texture, x: u32, y: u32, error: i32, kernel: &Kernel) {
    for &(dx, dy, weight) in kernel.entries {
        if let Some((nx, ny, color)) = neighbor(texture, x, y, dx, dy) {
            let share = error as f32 * weight as f32 / kernel.divisor as f32;
            texture.set_alpha(nx, ny, (color.a as f32 + share) as i32);
        }
    }
}

fn diffuse_color(texture: &mut Texture, x: u32, y: u32, error: Rgb, kernel: &Kernel) {
    for &(dx, dy, weight) in kernel.entries {
        if let Some((nx, ny, color)) = neighbor(texture, x, y, dx, dy) {
            let share = Rgba::new(
                error.r * weight / kernel.divisor,
                error.g * weight / kernel.divisor,
                error.b * weight / kernel.divisor,
                0,
            );
            texture.set(nx, ny, color + share);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::build(&[
            Rgb::new(0, 0, 0),
            Rgb::new(255, 255, 255),
            Rgb::new(0, 0, 0),
        ])
        .unwrap()
    }

    #[test]
    fn kernel_propagates_all_error() {
        let total: i32 = FLOYD_STEINBERG.entries.iter().map(|e| e.2).sum();
        assert_eq!(total, FLOYD_STEINBERG.divisor);
    }

    #[test]
    fn exact_palette_color_gives_constant_map() {
        let mut texture = Texture::filled(9, 7, Rgba::new(255, 255, 255, 255));
        let before = texture.clone();
        let map = floyd_steinberg(&mut texture, &palette());
        assert!(map.indices().iter().all(|&i| i == 6));
        // no error, nothing diffused
        assert_eq!(texture, before);
    }

    #[test]
    fn transparent_pixels_map_to_sentinel() {
        let mut texture = Texture::filled(5, 5, Rgba::new(30, 60, 90, 0));
        let map = floyd_steinberg(&mut texture, &palette());
        assert!(map.indices().iter().all(|&i| i == 0));
    }

    #[test]
    fn mid_gray_keeps_its_average_brightness() {
        let mut texture = Texture::filled(32, 32, Rgba::new(100, 100, 100, 255));
        let palette = palette();
        let map = floyd_steinberg(&mut texture, &palette);
        assert!(map.indices().iter().any(|&i| i == 8), "some pixels go black");
        let total: i32 = map
            .indices()
            .iter()
            .map(|&i| palette.colors()[usize::from(i)].r)
            .sum();
        let mean = total / 1024;
        assert!((88..=112).contains(&mean), "mean {mean}");
    }

    #[test]
    fn error_is_diffused_ahead_of_the_scan() {
        // 100 is closest to the darkest white tier (135) at index 7
        let mut texture = Texture::filled(3, 2, Rgba::new(100, 100, 100, 255));
        let palette = Palette::build(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
        let map = floyd_steinberg(&mut texture, &palette);
        assert_eq!(map.get(0, 0), Some(7));
        // (0, 0) pushes -35 * 7 / 16 = -15 into (1, 0)
        assert_eq!(texture.get(1, 0).map(|c| c.r), Some(100 - 35 * 7 / 16));
        assert_eq!(texture.get(1, 0).map(|c| c.a), Some(255));
    }

    fn texture_from(width: u32, pixels: &[Rgba]) -> Texture {
        let mut texture = Texture::new(width, pixels.len() as u32 / width);
        for (i, &pixel) in pixels.iter().enumerate() {
            texture.set(i as u32 % width, i as u32 / width, pixel);
        }
        texture
    }

    #[test]
    fn color_error_reaches_all_four_neighbors() {
        // (1, 0) quantizes to gray 181 with error (54, 19, -31). Each neighbor starts at
        // 181 minus its share so it lands exactly on 181 and adds no error of its own:
        //   7/16 -> (23, 8, -13), 3/16 -> (10, 3, -5), 5/16 -> (16, 5, -9), 1/16 -> (3, 1, -1)
        let palette = Palette::build(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
        let mut texture = texture_from(
            3,
            &[
                Rgba::new(255, 255, 255, 255),
                Rgba::new(235, 200, 150, 255),
                Rgba::new(158, 173, 194, 255),
                Rgba::new(171, 178, 186, 255),
                Rgba::new(165, 176, 190, 255),
                Rgba::new(178, 180, 182, 255),
            ],
        );
        let map = floyd_steinberg(&mut texture, &palette);
        assert_eq!(map.indices(), &[6, 4, 4, 4, 4, 4]);
        let gray = Rgba::new(181, 181, 181, 255);
        for (x, y) in [(2, 0), (0, 1), (1, 1), (2, 1)] {
            assert_eq!(texture.get(x, y), Some(gray), "({x}, {y})");
        }
    }

    #[test]
    fn alpha_error_reaches_all_four_neighbors() {
        // (1, 0) rounds to transparent with alpha error 100; the shares 43.75, 18.75, 31.25 and
        // 6.25 lift each neighbor to exactly 255 after truncation
        let white = |a| Rgba::new(255, 255, 255, a);
        let mut texture = texture_from(
            3,
            &[white(255), white(100), white(212), white(237), white(224), white(249)],
        );
        let map = floyd_steinberg(&mut texture, &palette());
        assert_eq!(map.indices(), &[6, 0, 6, 6, 6, 6]);
        for (x, y) in [(2, 0), (0, 1), (1, 1), (2, 1)] {
            assert_eq!(texture.get(x, y).map(|c| c.a), Some(255), "({x}, {y})");
        }
    }

    #[test]
    fn half_alpha_error_carries_to_neighbors() {
        let mut texture = Texture::filled(2, 1, Rgba::new(255, 255, 255, 100));
        let map = floyd_steinberg(&mut texture, &palette());
        // 100 rounds to 0, the remaining error 100 * 7 / 16 lifts the next pixel to 143
        assert_eq!(map.get(0, 0), Some(0));
        assert_eq!(texture.get(1, 0).map(|c| c.a), Some(143));
        assert_eq!(map.get(1, 0), Some(6));
    }

    #[test]
    fn edge_diffusion_is_discarded() {
        let mut texture = Texture::filled(1, 1, Rgba::new(10, 10, 10, 255));
        let map = floyd_steinberg(&mut texture, &palette());
        assert_eq!(map.indices(), &[8]);
        assert_eq!(texture.get(0, 0), Some(Rgba::new(10, 10, 10, 255)));
    }
}
