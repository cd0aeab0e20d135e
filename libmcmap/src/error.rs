use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout `libmcmap`
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Possible `libmcmap` errors
pub enum Error {
    /// Error returned if a source image cannot be opened or decoded
    #[error("failed to decode image {path:?}")]
    Decode {
        /// the image path
        path: PathBuf,
        /// the underlying codec error
        #[source]
        source: image::ImageError,
    },
    /// Error returned if a map or palette file cannot be read
    #[error("failed to read {path:?}")]
    DecodeIo {
        /// the file path
        path: PathBuf,
        /// the underlying i/o error
        #[source]
        source: std::io::Error,
    },
    /// Error returned if a decoded image has no pixels
    #[error("image has zero width or height: {width}x{height}")]
    EmptyImage {
        /// decoded width
        width: u32,
        /// decoded height
        height: u32,
    },
    /// Error returned if an output file cannot be encoded or written
    #[error("failed to write {path:?}")]
    Encode {
        /// the destination path
        path: PathBuf,
        /// the underlying codec error
        #[source]
        source: image::ImageError,
    },
    /// Error returned if an output file cannot be created or persisted
    #[error("failed to write {path:?}")]
    EncodeIo {
        /// the destination path
        path: PathBuf,
        /// the underlying i/o error
        #[source]
        source: std::io::Error,
    },
    /// Error returned if the output image format cannot be inferred from the path
    #[error("unsupported output image format: {0:?}")]
    UnsupportedFormat(PathBuf),
    /// Error returned if a palette contains no base colors
    #[error("palette contains no colors")]
    EmptyPalette,
    /// Error returned if a palette has no room for a color outside the reserved slots
    #[error("palette has {len} entries, at least {required} are required")]
    PaletteTooSmall {
        /// number of expanded entries
        len: usize,
        /// minimum number of expanded entries
        required: usize,
    },
    /// Error returned if a palette has more entries than a map cell can address
    #[error("palette has {len} entries, at most 256 can be addressed")]
    PaletteTooLarge {
        /// number of expanded entries
        len: usize,
    },
    /// Error returned if the palette source text cannot be parsed
    #[error("malformed palette record at line {line}, column {column}")]
    MalformedPalette {
        /// 1-based line of the offending record
        line: usize,
        /// 1-based column of the offending record
        column: usize,
    },
    /// Error returned if a map cell references a palette slot that does not exist
    #[error("palette index {index} is out of range for a palette of {palette_len} entries")]
    IndexOutOfRange {
        /// the offending index
        index: u8,
        /// number of entries in the palette
        palette_len: usize,
    },
    /// Error returned if the raster length does not match the given width/height
    #[error("raster length does not match width/height. width/height: {width_height:?}, raster_length: {raster_length:?}")]
    MismatchWidthHeight {
        /// width/height
        width_height: (u32, u32),
        /// raster length
        raster_length: usize,
    },
}
