#![allow(clippy::module_name_repetitions)]

mod parse;

pub use parse::parse_palette;

use std::{fs, path::Path, str::FromStr};

use tracing::{debug, instrument};

use crate::{color::Rgb, Error, Result};

/// Describes how base colors expand into palette entries
///
/// Every base color becomes one entry per tier factor, in order. The first `reserved` entries of
/// the expanded table mean "transparent" and are never matched against a color.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct PaletteLayout {
    /// Multipliers applied to each base color
    pub tier_factors: [f32; 4],
    /// Number of leading entries that mark transparency
    pub reserved: usize,
}

impl PaletteLayout {
    /// The shade tiers used by map art: darker, dark, full, darkest
    pub const STANDARD: Self = Self {
        tier_factors: [0.71, 0.86, 1.00, 0.53],
        reserved: 4,
    };

    /// The value written to a map cell that holds no color
    pub const TRANSPARENT_INDEX: u8 = 0;

    /// Returns `true` if `index` lies in the reserved transparent range
    #[must_use]
    pub const fn is_transparent(&self, index: u8) -> bool {
        (index as usize) < self.reserved
    }

    /// Number of entries a single base color expands into
    #[must_use]
    pub const fn tiers(&self) -> usize {
        self.tier_factors.len()
    }
}

impl Default for PaletteLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// An expanded, immutable palette table
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
    layout: PaletteLayout,
}

impl Palette {
    /// Expands `base_colors` with [`PaletteLayout::STANDARD`]
    ///
    /// # Errors
    ///
    /// This function errors if `base_colors` is empty
    pub fn build(base_colors: &[Rgb]) -> Result<Self> {
        Self::build_with_layout(base_colors, PaletteLayout::STANDARD)
    }

    /// Expands `base_colors` into one entry per tier, preserving order
    ///
    /// # Errors
    ///
    /// This function errors if `base_colors` is empty
    pub fn build_with_layout(base_colors: &[Rgb], layout: PaletteLayout) -> Result<Self> {
        if base_colors.is_empty() {
            return Err(Error::EmptyPalette);
        }
        let colors = base_colors
            .iter()
            .flat_map(|base| layout.tier_factors.map(|factor| base.scale(factor)))
            .collect::<Vec<_>>();
        debug!(
            "Expanded {} base colors into {} entries",
            base_colors.len(),
            colors.len()
        );
        Ok(Self { colors, layout })
    }

    /// Reads and expands a palette file
    ///
    /// See [`parse_palette`] for the file format.
    ///
    /// # Errors
    ///
    /// This function errors if the file cannot be read, is malformed or holds no colors
    #[instrument]
    pub fn from_file<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::DecodeIo {
            path: path.to_owned(),
            source,
        })?;
        text.parse()
    }

    /// Checks that the palette can be used to quantize colors
    ///
    /// # Errors
    ///
    /// This function errors if no entry lies outside the reserved range, or if there are more
    /// entries than a single byte can address
    pub fn ensure_searchable(&self) -> Result<()> {
        let required = self.layout.reserved + 1;
        if self.colors.len() < required {
            return Err(Error::PaletteTooSmall {
                len: self.colors.len(),
                required,
            });
        }
        if self.colors.len() > usize::from(u8::MAX) + 1 {
            return Err(Error::PaletteTooLarge {
                len: self.colors.len(),
            });
        }
        Ok(())
    }

    /// Returns the index of the entry closest to `color`
    ///
    /// The first entry after the reserved range is the starting candidate and may be returned
    /// even if it is not the closest among all entries; the search only replaces it with a
    /// strictly closer entry, so ties resolve to the lowest index.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::ensure_searchable`] would fail
    #[must_use]
    pub fn nearest_index(&self, color: Rgb) -> u8 {
        let first = self.layout.reserved;
        let mut nearest = first;
        let mut nearest_distance = self.colors[first].distance_sq(color);
        for (i, candidate) in self.colors.iter().enumerate().skip(first + 1) {
            let distance = candidate.distance_sq(color);
            if distance < nearest_distance {
                nearest = i;
                nearest_distance = distance;
            }
        }
        u8::try_from(nearest).unwrap_or(u8::MAX)
    }

    /// Returns the entry at `index`
    #[must_use]
    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Returns all entries, including the reserved ones
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Returns the layout the palette was built with
    #[must_use]
    pub const fn layout(&self) -> &PaletteLayout {
        &self.layout
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the palette holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl FromStr for Palette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::build(&parse_palette(s)?)
    }
}
