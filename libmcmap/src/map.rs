use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use tracing::{debug, info, instrument, warn};

use crate::{write::write_atomically, Error, Result, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// A grid of palette indices, stored row-major
///
/// The binary form of a map is exactly `width * height` bytes with no header, so the dimensions
/// always travel separately from the data.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MapData {
    /// The width of the map
    width: u32,
    /// The height of the map
    height: u32,
    /// Palette index of every cell
    indices: Vec<u8>,
}

impl Default for MapData {
    fn default() -> Self {
        Self::empty(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl MapData {
    /// Creates a new [`MapData`] where every cell is `0`
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            indices: vec![0; cell_count(width, height)],
        }
    }

    /// Creates a new [`MapData`] from existing indices
    ///
    /// # Errors
    ///
    /// This function errors if `indices` does not hold exactly `width * height` entries
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> Result<Self> {
        if indices.len() != cell_count(width, height) {
            return Err(Error::MismatchWidthHeight {
                width_height: (width, height),
                raster_length: indices.len(),
            });
        }
        Ok(Self::from_parts(width, height, indices))
    }

    pub(crate) fn from_parts(width: u32, height: u32, indices: Vec<u8>) -> Self {
        debug_assert_eq!(cell_count(width, height), indices.len());
        Self {
            width,
            height,
            indices,
        }
    }

    /// Decodes a map from its binary form
    ///
    /// At most `width * height` bytes are used. A short input is not an error: the cells it does
    /// not cover keep the value `0`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], width: u32, height: u32) -> Self {
        let mut map = Self::empty(width, height);
        let n = bytes.len().min(map.indices.len());
        map.indices[..n].copy_from_slice(&bytes[..n]);
        if n < map.indices.len() {
            warn!(
                "Map data is short: {n} of {} cells present",
                map.indices.len()
            );
        }
        map
    }

    /// Reads a map of the given dimensions from a reader
    ///
    /// See [`Self::from_bytes`] for the handling of short input.
    ///
    /// # Errors
    ///
    /// This function errors if reading from `r` fails
    pub fn from_reader(r: impl Read, width: u32, height: u32) -> std::io::Result<Self> {
        let mut bytes = Vec::with_capacity(cell_count(width, height));
        let read = r
            .take(cell_count(width, height) as u64)
            .read_to_end(&mut bytes)?;
        debug!("read {read} bytes of map data");
        Ok(Self::from_bytes(&bytes, width, height))
    }

    /// Reads a map of the given dimensions from a file
    ///
    /// # Errors
    ///
    /// This function errors if the file cannot be opened or read.
    /// See [`Self::from_reader`]
    #[instrument]
    pub fn from_file<P: AsRef<Path> + std::fmt::Debug>(
        filename: P,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let path = filename.as_ref();
        let to_error = |source| Error::DecodeIo {
            path: path.to_owned(),
            source,
        };
        let file = File::open(path).map_err(to_error)?;
        Self::from_reader(BufReader::new(file), width, height).map_err(to_error)
    }

    /// Encodes the map into its binary form
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.indices.clone()
    }

    /// Writes the binary form of the map to a file
    ///
    /// The file is replaced in one step: if writing fails, no partial map is left behind.
    ///
    /// # Errors
    ///
    /// This will error if unable to create and/or write to the provided filename
    #[instrument(skip(self), fields(width = self.width, height = self.height))]
    pub fn to_file<P: AsRef<Path> + std::fmt::Debug>(&self, filename: P) -> Result<()> {
        let path = filename.as_ref();
        write_atomically(path, &self.indices)?;
        info!("Wrote map to {}", path.display());
        Ok(())
    }

    /// Returns the width of the map
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the map
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the indices of the map
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Returns the index at `(x, y)`, or [`None`] if it lies outside the map
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.indices[self.offset(x, y)])
    }

    /// Sets the index at `(x, y)`
    ///
    /// Writes outside the map are discarded.
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.indices[i] = value;
        }
    }

    const fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

const fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
