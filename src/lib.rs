//! Plain PBM (`P1`) decoding, rotation and encoding.
//!
//! # Pipeline
//!
//! - **Decode** ([`Pbm::decode`], [`PbmDecoder`]): a byte-level state machine
//!   reads the `P1` tag, dimensions and comments, then the `0`/`1` pixel
//!   tokens, straight from any [`std::io::Read`].
//! - **Rotate** ([`OpRotateBitmap`]): maps every pixel through a rotation
//!   matrix onto the smallest canvas that holds the result. Exact quarter
//!   turns delegate to [`OpOrient90Increments`].
//! - **Encode** ([`Pbm::encode`]): writes the canonical text form back out.
//!
//! # Example
//!
//! ```
//! use pbm_rotate::{OpRotateBitmap, Pbm, RotateDirection};
//!
//! let input = b"P1\n# arrow\n3 2\n0 1 0\n1 1 1\n";
//! let mut image = Pbm::decode(&input[..])?;
//!
//! // Rotate 90 degrees clockwise.
//! let mut rotate = OpRotateBitmap::new();
//! rotate.set_rotation(90.0, RotateDirection::Cw);
//! image.rotate(&rotate)?;
//! assert_eq!((image.width(), image.height()), (2, 3));
//!
//! let mut output = Vec::new();
//! image.encode(&mut output)?;
//! assert_eq!(output, b"P1\n# arrow\n2 3\n1 0 \n1 1 \n1 0 \n");
//! # Ok::<(), pbm_rotate::PbmError>(())
//! ```

#[doc(hidden)]
pub mod bench_utils;
mod bitmap;
mod decode;
mod encode;
mod error;
mod op_orient_90;
mod op_rotate_bitmap;
mod reader;

pub use crate::bitmap::{Bitmap, Header, Pbm, Pixel};
pub use crate::decode::{DEFAULT_MAX_PIXELS, PbmDecoder};
pub use crate::error::{PbmError, Result};
pub use crate::op_orient_90::{OpOrient90Increments, Orientation90};
pub use crate::op_rotate_bitmap::{OpRotateBitmap, QUARTER_TURN_EPSILON, RotateDirection};
pub use crate::reader::{FORMAT_TAG, HeaderState, HeaderToken, PbmReader, Resume};
