//! Error types for decoding, rotating and encoding plain PBM images.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Every failure the decode-rotate-encode pipeline can report.
///
/// The type is `Clone` so a [`PbmReader`](crate::PbmReader) can keep its first
/// error and hand it back on every later read.
#[derive(Debug, Clone, Error)]
pub enum PbmError {
    /// The first three bytes are not `P1` followed by whitespace.
    #[error("invalid format tag: expected \"P1\" followed by whitespace, got {found:?}")]
    InvalidFormatTag { found: Vec<u8> },

    /// The stream ended before width and height were read.
    #[error("unexpected end of stream in header")]
    UnexpectedEndOfHeader,

    /// A byte that is not a digit, whitespace or `#` appeared in the header.
    #[error("unexpected character in header: {:?}", as_char(.byte))]
    UnexpectedCharacterInHeader { byte: u8 },

    /// A byte other than `0`, `1` or whitespace appeared in the pixel data.
    #[error("invalid pixel token {:?} at row {row}, column {col}", as_char(.byte))]
    InvalidPixelToken { byte: u8, row: usize, col: usize },

    /// The pixel data does not fill the grid declared by the header.
    #[error("malformed bitmap: expected {expected} pixels, got {actual}")]
    MalformedBitmap { expected: usize, actual: usize },

    /// A header number does not fit in `usize`.
    #[error("header number overflows")]
    HeaderNumberOverflow,

    /// A header declared a zero width or height.
    #[error("invalid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },

    /// Declared dimensions overflow or exceed the decoder's pixel limit.
    #[error("dimensions {width}x{height} exceed the limit of {limit} pixels")]
    DimensionTooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },

    /// Rotation was requested on a bitmap without pixels.
    #[error("cannot rotate an empty bitmap")]
    EmptyBitmap,

    /// Rotation angle is NaN or infinite.
    #[error("invalid rotation angle: {0}")]
    InvalidAngle(f64),

    /// The byte source or sink failed.
    #[error("I/O error: {0}")]
    Io(Arc<io::Error>),
}

impl From<io::Error> for PbmError {
    fn from(err: io::Error) -> Self {
        PbmError::Io(Arc::new(err))
    }
}

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PbmError>;
