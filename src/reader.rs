//! Byte-level PBM header reader.
//!
//! # State Machine
//!
//! After the `P1` format tag, the header is tokenized one byte at a time by
//! [`HeaderState::transition`], without a separate tokenizing pass:
//!
//! ```text
//! SkippingWhitespace  --digit-->       NumberAccumulation
//! SkippingWhitespace  --'#'-->         CommentAccumulation (resume: SkippingWhitespace)
//! NumberAccumulation  --digit-->       NumberAccumulation
//! NumberAccumulation  --whitespace-->  SkippingWhitespace   emits Number
//! NumberAccumulation  --'#'-->         CommentAccumulation (resume: NumberAccumulation)
//! CommentAccumulation --'\n' | '\r'--> resume state          emits Comment
//! any state           --end of stream-> UnexpectedEndOfHeader
//! ```
//!
//! A comment remembers the state it interrupted and resumes it afterwards, so
//! a comment inside a number does not end that number. Parsing stops as soon
//! as the second number (height) is terminated by whitespace; anything after
//! that byte is left in the stream for the pixel decoder.
//!
//! # Sticky Errors
//!
//! [`PbmReader`] keeps the first error it encounters. Every later read returns
//! that same error without touching the underlying source.

use std::io::{self, BufRead, BufReader, Read};

use tracing::trace;

use crate::bitmap::Header;
use crate::error::{PbmError, Result};

/// Magic number of the plain (ASCII) bi-level variant.
pub const FORMAT_TAG: &[u8; 2] = b"P1";

/// Whitespace as defined by the Netpbm formats.
pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_line_terminator(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r')
}

/// State a comment returns to once its line ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resume {
    SkippingWhitespace,
    NumberAccumulation { value: usize },
}

impl From<Resume> for HeaderState {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::SkippingWhitespace => HeaderState::SkippingWhitespace,
            Resume::NumberAccumulation { value } => HeaderState::NumberAccumulation { value },
        }
    }
}

/// Token completed by a single transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderToken {
    Number(usize),
    Comment(String),
}

/// Tokenizer state for the header after the format tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderState {
    SkippingWhitespace,
    NumberAccumulation { value: usize },
    CommentAccumulation { text: Vec<u8>, resume: Resume },
}

impl HeaderState {
    /// Feeds one byte (`None` at end of stream) and returns the next state,
    /// plus the token the byte completed, if any.
    pub fn transition(self, input: Option<u8>) -> Result<(HeaderState, Option<HeaderToken>)> {
        let Some(byte) = input else {
            return Err(PbmError::UnexpectedEndOfHeader);
        };

        match self {
            HeaderState::SkippingWhitespace => match byte {
                b'0'..=b'9' => Ok((
                    HeaderState::NumberAccumulation {
                        value: usize::from(byte - b'0'),
                    },
                    None,
                )),
                b'#' => Ok((
                    HeaderState::CommentAccumulation {
                        text: Vec::new(),
                        resume: Resume::SkippingWhitespace,
                    },
                    None,
                )),
                _ if is_whitespace(byte) => Ok((HeaderState::SkippingWhitespace, None)),
                _ => Err(PbmError::UnexpectedCharacterInHeader { byte }),
            },
            HeaderState::NumberAccumulation { value } => match byte {
                b'0'..=b'9' => {
                    let value = value
                        .checked_mul(10)
                        .and_then(|value| value.checked_add(usize::from(byte - b'0')))
                        .ok_or(PbmError::HeaderNumberOverflow)?;
                    Ok((HeaderState::NumberAccumulation { value }, None))
                }
                b'#' => Ok((
                    HeaderState::CommentAccumulation {
                        text: Vec::new(),
                        resume: Resume::NumberAccumulation { value },
                    },
                    None,
                )),
                _ if is_whitespace(byte) => Ok((
                    HeaderState::SkippingWhitespace,
                    Some(HeaderToken::Number(value)),
                )),
                _ => Err(PbmError::UnexpectedCharacterInHeader { byte }),
            },
            HeaderState::CommentAccumulation { mut text, resume } => {
                if !is_line_terminator(byte) {
                    text.push(byte);
                    return Ok((HeaderState::CommentAccumulation { text, resume }, None));
                }
                let body = match text.split_first() {
                    Some((&first, rest)) if is_whitespace(first) => rest,
                    _ => &text[..],
                };
                let comment = String::from_utf8_lossy(body).into_owned();
                Ok((resume.into(), Some(HeaderToken::Comment(comment))))
            }
        }
    }
}

/// Buffered byte reader for PBM streams with a sticky error.
#[derive(Debug)]
pub struct PbmReader<R> {
    inner: BufReader<R>,
    err: Option<PbmError>,
}

impl<R: Read> PbmReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            err: None,
        }
    }

    /// Returns the first error recorded by this reader, if any.
    pub fn err(&self) -> Option<&PbmError> {
        self.err.as_ref()
    }

    /// Records `err` unless an earlier error is already stored, and returns
    /// the stored one.
    pub fn fail(&mut self, err: PbmError) -> PbmError {
        self.err.get_or_insert(err).clone()
    }

    /// Reads the next byte, or `None` at end of stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.fail(err.into())),
            };
            let Some(&byte) = buf.first() else {
                return Ok(None);
            };
            self.inner.consume(1);
            return Ok(Some(byte));
        }
    }

    /// Validates the format tag and reads width, height and comments.
    ///
    /// Both dimensions must be at least 1.
    pub fn read_header(&mut self) -> Result<Header> {
        self.parse_header().map_err(|err| self.fail(err))
    }

    fn parse_header(&mut self) -> Result<Header> {
        self.read_format_tag()?;

        let mut numbers = [0_usize; 2];
        let mut count = 0;
        let mut comments = Vec::new();
        let mut state = HeaderState::SkippingWhitespace;

        while count < numbers.len() {
            let byte = self.next_byte()?;
            let (next, token) = state.transition(byte)?;
            match token {
                Some(HeaderToken::Number(value)) => {
                    numbers[count] = value;
                    count += 1;
                }
                Some(HeaderToken::Comment(comment)) => comments.push(comment),
                None => {}
            }
            trace!(?next, "header transition");
            state = next;
        }

        let [width, height] = numbers;
        if width == 0 || height == 0 {
            return Err(PbmError::InvalidDimensions { width, height });
        }

        let mut header = Header::new(width, height);
        for comment in comments {
            header.push_comment(comment);
        }
        Ok(header)
    }

    fn read_format_tag(&mut self) -> Result<()> {
        let mut found = Vec::with_capacity(3);
        for expected in FORMAT_TAG.iter().copied().map(Some).chain([None]) {
            let byte = self.next_byte()?;
            if let Some(byte) = byte {
                found.push(byte);
            }
            let ok = match (expected, byte) {
                (Some(expected), Some(byte)) => byte == expected,
                (None, Some(byte)) => is_whitespace(byte),
                (_, None) => false,
            };
            if !ok {
                return Err(PbmError::InvalidFormatTag { found });
            }
        }
        Ok(())
    }
}
