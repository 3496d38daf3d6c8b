//! Plain PBM decoding.
//!
//! The decoder reads the header through [`PbmReader`] and then scans the same
//! byte stream for pixel tokens. Rows are reserved one at a time as the scan
//! reaches them, so a header that declares a large image but carries little
//! data never forces the full allocation up front.

use std::io::Read;

use tracing::debug;

use crate::bitmap::{Bitmap, Pbm};
use crate::error::{PbmError, Result};
use crate::reader::{PbmReader, is_whitespace};

/// Default upper bound on `width * height` accepted from a header.
pub const DEFAULT_MAX_PIXELS: usize = 1 << 28;

/// Decoder for plain (`P1`) PBM streams.
#[derive(Copy, Clone, Debug)]
pub struct PbmDecoder {
    max_pixels: usize,
}

impl Default for PbmDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PbmDecoder {
    pub fn new() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Sets the largest pixel count a header may declare.
    pub fn set_max_pixels(&mut self, max_pixels: usize) -> &mut Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn max_pixels(&self) -> usize {
        self.max_pixels
    }

    /// Decodes a complete image from `source`.
    pub fn decode<R: Read>(&self, source: R) -> Result<Pbm> {
        let mut reader = PbmReader::new(source);
        self.decode_from(&mut reader)
    }

    /// Decodes an image from a reader positioned at the format tag.
    ///
    /// Bytes following the last pixel token are left unread.
    pub fn decode_from<R: Read>(&self, reader: &mut PbmReader<R>) -> Result<Pbm> {
        let header = reader.read_header()?;
        let (width, height) = (header.width(), header.height());
        let total = width
            .checked_mul(height)
            .filter(|&total| total <= self.max_pixels)
            .ok_or_else(|| {
                reader.fail(PbmError::DimensionTooLarge {
                    width,
                    height,
                    limit: self.max_pixels,
                })
            })?;

        let mut data = Vec::with_capacity(width);
        let (mut row, mut col) = (0_usize, 0_usize);
        while data.len() < total {
            let Some(byte) = reader.next_byte()? else {
                return Err(reader.fail(PbmError::MalformedBitmap {
                    expected: total,
                    actual: data.len(),
                }));
            };
            match byte {
                b'0' | b'1' => {
                    if col == 0 && row > 0 {
                        data.reserve(width);
                    }
                    data.push(byte - b'0');
                    col += 1;
                    if col == width {
                        col = 0;
                        row += 1;
                    }
                }
                _ if is_whitespace(byte) => {}
                _ => return Err(reader.fail(PbmError::InvalidPixelToken { byte, row, col })),
            }
        }

        debug!(
            width,
            height,
            comments = header.comments().len(),
            "decoded PBM image"
        );
        Ok(Pbm::from_parts(
            header,
            Bitmap::from_raw(width, height, data),
        ))
    }
}

impl Pbm {
    /// Decodes a plain PBM image with the default [`PbmDecoder`] settings.
    pub fn decode<R: Read>(source: R) -> Result<Self> {
        PbmDecoder::new().decode(source)
    }
}
