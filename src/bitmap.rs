//! Bi-level bitmap representation with row-major pixel storage.
//!
//! # Memory Layout
//!
//! Pixels are stored in a flat buffer in row-major order, one byte per pixel:
//!
//! ```text
//! data[y * width + x]
//! ```
//!
//! Each byte is either `0` (white) or `1` (black), as in the plain PBM format.

use std::fmt;

use crate::error::{PbmError, Result};

/// A single bi-level pixel value, `0` or `1`.
pub type Pixel = u8;

/// Header metadata of a PBM image.
///
/// Comments keep their source order. They never contain line breaks: any `\r`
/// or `\n` handed to [`Header::push_comment`] is replaced with a space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    width: usize,
    height: usize,
    comments: Vec<String>,
}

impl Header {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            comments: Vec::new(),
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Appends a comment, collapsing line breaks to spaces.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        let comment = if comment.contains(['\r', '\n']) {
            comment.replace(['\r', '\n'], " ")
        } else {
            comment
        };
        self.comments.push(comment);
    }

    pub(crate) fn set_dimensions(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }
}

/// A `height x width` grid of bi-level pixels.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<Pixel>,
}

impl Bitmap {
    /// Creates an all-zero bitmap. Panics if `width * height` overflows.
    pub fn new(width: usize, height: usize) -> Self {
        let Some(len) = width.checked_mul(height) else {
            panic!("bitmap dimensions {width}x{height} overflow usize");
        };
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Creates a bitmap with no dimensions.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Builds a bitmap from nested rows.
    ///
    /// Every row must have the same length and every value must be `0` or `1`.
    pub fn from_rows<R: AsRef<[Pixel]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.iter().any(|row| row.as_ref().len() != width) {
            return Err(PbmError::MalformedBitmap {
                expected: width * height,
                actual: rows.iter().map(|row| row.as_ref().len()).sum(),
            });
        }
        let mut data = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if let Some(x) = row.iter().position(|&value| value > 1) {
                return Err(PbmError::InvalidPixelToken {
                    byte: row[x],
                    row: y,
                    col: x,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps a row-major buffer that the caller has already validated.
    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<Pixel>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when the bitmap holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the pixels of row `y`.
    pub fn row(&self, y: usize) -> &[Pixel] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Returns mutable pixels of row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        // chunks_exact panics on zero; a zero-width bitmap has no rows anyway.
        self.data.chunks_exact(self.width.max(1))
    }

    /// Returns the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.data[y * self.width + x]
    }

    /// Sets the pixel at column `x`, row `y`. Non-zero values are stored as `1`.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: Pixel) {
        self.data[y * self.width + x] = Pixel::from(value != 0);
    }

    /// Returns the number of black (`1`) pixels.
    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&value| value == 1).count()
    }

    /// Returns the raw row-major pixel buffer.
    pub fn as_slice(&self) -> &[Pixel] {
        &self.data
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitmap {}x{} [", self.width, self.height)?;
        for row in self.rows() {
            write!(f, "  ")?;
            for value in row {
                write!(f, "{value}")?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

/// A decoded PBM image: one header paired with one bitmap.
///
/// The header's width and height always match the bitmap's dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pbm {
    header: Header,
    bitmap: Bitmap,
}

impl Pbm {
    /// Pairs a bitmap with comments, deriving the header dimensions from it.
    ///
    /// A bitmap with a zero width or height is accepted so callers can hold
    /// such an image, but it cannot be rotated ([`PbmError::EmptyBitmap`]) and
    /// its encoding does not decode ([`PbmError::InvalidDimensions`]).
    pub fn new<I, S>(bitmap: Bitmap, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut header = Header::new(bitmap.width(), bitmap.height());
        for comment in comments {
            header.push_comment(comment);
        }
        Self { header, bitmap }
    }

    pub(crate) fn from_parts(header: Header, bitmap: Bitmap) -> Self {
        debug_assert_eq!(header.width(), bitmap.width());
        debug_assert_eq!(header.height(), bitmap.height());
        Self { header, bitmap }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.header.width()
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.header.height()
    }

    pub fn comments(&self) -> &[String] {
        self.header.comments()
    }

    /// Replaces the bitmap, updating the header dimensions. Comments are kept.
    pub fn replace_bitmap(&mut self, bitmap: Bitmap) {
        self.header.set_dimensions(bitmap.width(), bitmap.height());
        self.bitmap = bitmap;
    }

    /// Splits the image into its header and bitmap.
    pub fn into_parts(self) -> (Header, Bitmap) {
        (self.header, self.bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let bitmap = Bitmap::new(3, 2);
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
        assert_eq!(bitmap.as_slice(), &[0; 6]);
        assert_eq!(bitmap.count_ones(), 0);
    }

    #[test]
    fn test_row_and_pixel_layout() {
        let mut bitmap = Bitmap::new(3, 2);
        bitmap.row_mut(1).copy_from_slice(&[1, 0, 1]);
        bitmap.set_pixel(1, 0, 7);

        assert_eq!(bitmap.row(0), &[0, 1, 0]);
        assert_eq!(bitmap.row(1), &[1, 0, 1]);
        assert_eq!(bitmap.pixel(0, 1), 1);
        assert_eq!(bitmap.pixel(1, 1), 0);
        assert_eq!(bitmap.rows().count(), 2);
        assert_eq!(bitmap.count_ones(), 3);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = Bitmap::from_rows(&[vec![0, 1], vec![1]]).unwrap_err();
        assert!(matches!(
            err,
            PbmError::MalformedBitmap {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_from_rows_rejects_non_binary_values() {
        let err = Bitmap::from_rows(&[[0, 1], [2, 0]]).unwrap_err();
        assert!(matches!(
            err,
            PbmError::InvalidPixelToken {
                byte: 2,
                row: 1,
                col: 0
            }
        ));
    }

    #[test]
    fn test_empty_bitmap_has_no_rows() {
        let bitmap = Bitmap::new_empty();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.rows().count(), 0);
    }

    #[test]
    #[should_panic(expected = "overflow usize")]
    fn test_new_rejects_overflowing_dimensions() {
        Bitmap::new(usize::MAX, 2);
    }

    #[test]
    fn test_push_comment_collapses_line_breaks() {
        let mut header = Header::new(1, 1);
        header.push_comment("first\r\nsecond\nthird");
        assert_eq!(header.comments(), &["first  second third".to_string()]);
    }

    #[test]
    fn test_replace_bitmap_keeps_comments() {
        let mut pbm = Pbm::new(Bitmap::new(2, 3), ["made by hand"]);
        pbm.replace_bitmap(Bitmap::new(3, 2));
        assert_eq!(pbm.width(), 3);
        assert_eq!(pbm.height(), 2);
        assert_eq!(pbm.comments(), &["made by hand".to_string()]);
    }
}
