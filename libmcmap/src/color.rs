use std::ops::{Add, Div, Sub};

/// An RGB color at working precision
///
/// Channels are nominally in `0..=255`, but intermediate values produced by dithering may fall
/// outside that range.
#[derive(Default, Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct Rgb {
    /// red channel
    pub r: i32,
    /// green channel
    pub g: i32,
    /// blue channel
    pub b: i32,
}

/// An RGBA color at working precision
///
/// See [`Rgb`] for the channel range.
#[derive(Default, Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct Rgba {
    /// red channel
    pub r: i32,
    /// green channel
    pub g: i32,
    /// blue channel
    pub b: i32,
    /// alpha channel
    pub a: i32,
}

impl Rgb {
    /// Creates a new [`Rgb`]
    #[must_use]
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Multiplies every channel by `factor`, truncating towards zero
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            r: (self.r as f32 * factor) as i32,
            g: (self.g as f32 * factor) as i32,
            b: (self.b as f32 * factor) as i32,
        }
    }

    /// Adds the same offset to every channel
    #[must_use]
    pub const fn offset(self, delta: i32) -> Self {
        Self {
            r: self.r + delta,
            g: self.g + delta,
            b: self.b + delta,
        }
    }

    /// Squared euclidean distance between two colors
    #[must_use]
    pub fn distance_sq(self, other: Self) -> i64 {
        let d = self - other;
        [d.r, d.g, d.b]
            .into_iter()
            .map(|c| i64::from(c) * i64::from(c))
            .sum()
    }
}

impl Sub for Rgb {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r.into(), g.into(), b.into())
    }
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black, the fill value of new buffers
    pub const OPAQUE_BLACK: Self = Self::new(0, 0, 0, 255);

    /// Creates a new [`Rgba`]
    #[must_use]
    pub const fn new(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an [`Rgba`] from a color and an alpha value
    #[must_use]
    pub const fn from_rgb(rgb: Rgb, a: i32) -> Self {
        Self::new(rgb.r, rgb.g, rgb.b, a)
    }

    /// Returns the color channels
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Linear interpolation between `a` and `b`, truncating towards zero
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        let lerp = |a: i32, b: i32| (a as f32 + t * (b - a) as f32) as i32;
        Self::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
    }

    /// Converts to 8-bit channels, clamping anything outside `0..=255`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c.clamp(0, 255) as u8)
    }
}

impl Add for Rgba {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl Div<i32> for Rgba {
    type Output = Self;

    fn div(self, rhs: i32) -> Self::Output {
        Self::new(self.r / rhs, self.g / rhs, self.b / rhs, self.a / rhs)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r.into(), g.into(), b.into(), a.into())
    }
}
