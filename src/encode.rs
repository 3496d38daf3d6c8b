//! Plain PBM encoding.
//!
//! The canonical form written here is what [`Pbm::decode`] reads back:
//!
//! ```text
//! P1
//! # one line per comment
//! <width> <height>
//! 0 1 0 <- every pixel followed by a space, one row per line
//! ```

use std::fmt;
use std::io::Write;

use tracing::debug;

use crate::bitmap::Pbm;
use crate::error::Result;

impl fmt::Display for Pbm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "P1")?;
        // Header::push_comment keeps line breaks out of comments.
        for comment in self.comments() {
            writeln!(f, "# {comment}")?;
        }
        writeln!(f, "{} {}", self.width(), self.height())?;
        for row in self.bitmap().rows() {
            for value in row {
                write!(f, "{value} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Pbm {
    /// Renders the canonical encoding into memory.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Writes the canonical encoding to `sink` and flushes it.
    ///
    /// The whole image is rendered before the first write, so a failure can
    /// only come from the sink itself. A failed write may leave a partial
    /// image in the sink; the error is always returned.
    pub fn encode<W: Write>(&self, mut sink: W) -> Result<()> {
        let bytes = self.encode_to_vec();
        sink.write_all(&bytes)?;
        sink.flush()?;
        debug!(bytes = bytes.len(), "encoded PBM image");
        Ok(())
    }
}
