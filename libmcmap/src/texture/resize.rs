use itertools::iproduct;
use tracing::{debug, instrument};

use super::{Sampling, Texture, Wrapping};
use crate::color::Rgba;

/// Distance of the four antialiasing taps from the sample point
const TAP_OFFSET: f32 = 1.0;

impl Texture {
    /// Rescales the texture to `width` x `height`
    ///
    /// Every destination pixel averages four bilinear taps placed diagonally around its
    /// source coordinate, which softens aliasing when shrinking.
    /// Does nothing if the dimensions are unchanged.
    #[instrument(skip(self), fields(from_width = self.width, from_height = self.height))]
    #[allow(clippy::cast_precision_loss)]
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        let (old_width, old_height) = (self.width as f32, self.height as f32);

        let pixels = iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                // x * old / new, in that order
                let sx = x as f32 * old_width / width as f32;
                let sy = y as f32 * old_height / height as f32;
                let tap = |dx: f32, dy: f32| {
                    self.sample(
                        sx + dx * TAP_OFFSET,
                        sy + dy * TAP_OFFSET,
                        Sampling::Bilinear,
                        Wrapping::Clamp,
                    )
                };
                // four distinct diagonals, no tap is counted twice
                (tap(-1.0, 1.0) + tap(1.0, 1.0) + tap(-1.0, -1.0) + tap(1.0, -1.0)) / 4
            })
            .collect();

        debug!("Resized to {width}x{height}");
        *self = Self::from_parts(width, height, pixels);
    }

    /// Changes the canvas size to `width` x `height`, keeping the content centered
    ///
    /// Pixels are copied verbatim. Area not covered by the old canvas becomes fully transparent
    /// and content falling outside the new canvas is cropped.
    /// Does nothing if the dimensions are unchanged.
    #[instrument(skip(self), fields(from_width = self.width, from_height = self.height))]
    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        let offset_x = (i64::from(self.width) - i64::from(width)) / 2;
        let offset_y = (i64::from(self.height) - i64::from(height)) / 2;

        let pixels = iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                let sx = i64::from(x) + offset_x;
                let sy = i64::from(y) + offset_y;
                match (u32::try_from(sx), u32::try_from(sy)) {
                    (Ok(sx), Ok(sy)) => self.get(sx, sy).unwrap_or(Rgba::TRANSPARENT),
                    _ => Rgba::TRANSPARENT,
                }
            })
            .collect();

        debug!("Reframed canvas to {width}x{height} (offset {offset_x}, {offset_y})");
        *self = Self::from_parts(width, height, pixels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> Texture {
        let mut t = Texture::new(width, height);
        for y in 0..height {
            for x in 0..width {
                t.set(x, y, Rgba::new((x + y * width) as i32, 0, 0, 255));
            }
        }
        t
    }

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut t = numbered(5, 4);
        let before = t.clone();
        t.resize(5, 4);
        t.resize_canvas(5, 4);
        assert_eq!(t, before);
    }

    #[test]
    fn resize_of_flat_color_stays_flat() {
        let c = Rgba::new(10, 20, 30, 255);
        let mut t = Texture::filled(40, 30, c);
        t.resize(13, 7);
        assert_eq!((t.width(), t.height()), (13, 7));
        assert_eq!(t.pixels().len(), 13 * 7);
        assert!(t.pixels().iter().all(|&p| p == c));
    }

    #[test]
    fn resize_averages_diagonal_taps() {
        let mut t = Texture::filled(4, 4, Rgba::new(0, 0, 0, 255));
        t.set(0, 0, Rgba::new(200, 0, 0, 255));
        t.resize(2, 2);
        // at (0, 0) the taps clamp to (0,1), (1,1), (0,0), (1,0): only one hits the red pixel
        assert_eq!(t.get(0, 0), Some(Rgba::new(50, 0, 0, 255)));
    }

    #[test]
    fn resize_source_coordinate_is_scaled_before_division() {
        let mut t = Texture::new(19, 1);
        for x in 0..19 {
            t.set(x, 0, Rgba::new(255 * (x as i32 % 2), 0, 0, 255));
        }
        t.resize(15, 1);
        let reds = t.pixels().iter().map(|p| p.r).collect::<Vec<_>>();
        // x = 10 samples at 10 * 19 / 15 = 12.666667, not 10 * (19 / 15) = 12.666666
        assert_eq!(
            reds,
            [127, 67, 119, 203, 16, 169, 152, 33, 221, 101, 84, 238, 50, 135, 93]
        );
    }

    #[test]
    fn canvas_padding_is_transparent_and_centered() {
        let mut t = Texture::filled(2, 2, Rgba::new(9, 9, 9, 255));
        t.resize_canvas(4, 4);
        assert_eq!(t.get(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(t.get(3, 3), Some(Rgba::TRANSPARENT));
        assert_eq!(t.get(1, 1), Some(Rgba::new(9, 9, 9, 255)));
        assert_eq!(t.get(2, 2), Some(Rgba::new(9, 9, 9, 255)));
    }

    #[test]
    fn canvas_crop_keeps_center() {
        let mut t = numbered(5, 5);
        t.resize_canvas(3, 3);
        // offset (5 - 3) / 2 = 1
        assert_eq!(t.get(0, 0), Some(Rgba::new(6, 0, 0, 255)));
        assert_eq!(t.get(2, 2), Some(Rgba::new(18, 0, 0, 255)));
    }

    #[test]
    fn pad_then_crop_restores_the_original() {
        let original = numbered(5, 3);
        for (w, h) in [(5, 3), (6, 3), (7, 8), (12, 9), (128, 128)] {
            let mut t = original.clone();
            t.resize_canvas(w, h);
            t.resize_canvas(5, 3);
            assert_eq!(t, original, "via {w}x{h}");
        }
    }
}
