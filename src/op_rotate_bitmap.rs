//! Arbitrary-angle bitmap rotation with a rotation matrix.
//!
//! # Algorithm Overview
//!
//! Source pixel `(i, j)` (row `i`, column `j`) is mapped forward with
//!
//! ```text
//! x = trunc(i * cos θ - j * sin θ)     destination row, before shifting
//! y = trunc(i * sin θ + j * cos θ)     destination column, before shifting
//! ```
//!
//! where `trunc` rounds toward zero.
//!
//! 1. **Fast-path detection**: Angles whose sine and cosine are both within
//!    [`QUARTER_TURN_EPSILON`] of `-1`, `0` or `1` use exact values and delegate to
//!    [`OpOrient90Increments`], which produces the same grid without
//!    floating point.
//!
//! 2. **Bounding box**: The mapping is linear and truncation is monotonic, so
//!    the extreme coordinates over the whole grid are reached at the four
//!    corners. The canvas spans `x_min..=x_max` rows and `y_min..=y_max`
//!    columns; both ranges include 0 because `(0, 0)` maps to itself.
//!
//! 3. **Placement**: Every source pixel is copied to its shifted destination
//!    in row-major source order. No interpolation is done: destination cells
//!    with no source stay `0`, and when several sources land on the same cell
//!    the last one in row-major order wins.

use tracing::debug;

use crate::bitmap::{Bitmap, Pbm};
use crate::error::{PbmError, Result};
use crate::op_orient_90::{OpOrient90Increments, Orientation90};

/// Tolerance on sine and cosine below which an angle is treated as an exact
/// quarter turn.
pub const QUARTER_TURN_EPSILON: f64 = 1e-9;

/// Visual direction of a rotation given in degrees.
///
/// - `Cw`: clockwise on screen (row 0 at the top); the angle is negated
/// - `Ccw`: counter-clockwise on screen; the angle is used as is
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RotateDirection {
    Cw,
    Ccw,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Transform {
    cos: f64,
    sin: f64,
}

impl Transform {
    fn map(&self, i: usize, j: usize) -> (i64, i64) {
        let (i, j) = (i as f64, j as f64);
        let x = (i * self.cos - j * self.sin) as i64;
        let y = (i * self.sin + j * self.cos) as i64;
        (x, y)
    }
}

/// Bounding box of mapped coordinates, always containing the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Bounds {
    x_min: i64,
    x_max: i64,
    y_min: i64,
    y_max: i64,
}

impl Bounds {
    fn include(mut self, (x, y): (i64, i64)) -> Self {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
        self
    }

    fn shift(&self) -> (i64, i64) {
        (self.x_min.abs(), self.y_min.abs())
    }

    /// Returns `(width, height)` of the canvas: columns span y, rows span x.
    fn canvas_dimensions(&self) -> (usize, usize) {
        let (shift_x, shift_y) = self.shift();
        let rows = self.x_max + shift_x + 1;
        let cols = self.y_max + shift_y + 1;
        (cols as usize, rows as usize)
    }
}

/// Arbitrary-angle rotation of bi-level bitmaps.
///
/// Angles are in radians; a positive angle rotates counter-clockwise as seen
/// on screen. The output canvas is the smallest grid holding every mapped
/// source pixel, so nothing is clipped.
///
/// # Fast Path
///
/// When the angle is a multiple of 90 degrees, the operator delegates to
/// [`OpOrient90Increments`]. Disable this with [`set_fast_path`] to force the
/// matrix path; both give identical output for quarter turns.
///
/// [`set_fast_path`]: OpRotateBitmap::set_fast_path
#[derive(Clone, Debug)]
pub struct OpRotateBitmap {
    angle: f64,
    fast_path: bool,
    quarter_turn: Option<Orientation90>,
}

impl Default for OpRotateBitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl OpRotateBitmap {
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            fast_path: true,
            quarter_turn: Some(Orientation90::Up),
        }
    }

    /// Sets the angle in radians, positive meaning counter-clockwise.
    pub fn set_angle(&mut self, radians: f64) -> &mut Self {
        self.angle = radians;
        self.quarter_turn = quarter_turn(radians);
        self
    }

    /// Sets the angle in degrees with an explicit visual direction.
    pub fn set_rotation(&mut self, angle_degrees: f64, direction: RotateDirection) -> &mut Self {
        let radians = angle_degrees.to_radians();
        match direction {
            RotateDirection::Cw => self.set_angle(-radians),
            RotateDirection::Ccw => self.set_angle(radians),
        }
    }

    /// Enables or disables delegation of quarter turns to
    /// [`OpOrient90Increments`].
    pub fn set_fast_path(&mut self, enabled: bool) -> &mut Self {
        self.fast_path = enabled;
        self
    }

    /// Returns the angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Returns the orientation when the angle is a quarter turn.
    pub fn quarter_turn(&self) -> Option<Orientation90> {
        self.quarter_turn
    }

    /// Returns `(width, height)` of the rotated canvas without rotating.
    pub fn compute_output_dimensions(&self, src: &Bitmap) -> Result<(usize, usize)> {
        self.validate(src)?;
        if let Some(orientation) = self.fast_orientation() {
            return Ok(OpOrient90Increments::new(orientation).compute_output_dimensions(src));
        }
        Ok(find_bounds(src, &self.transform()).canvas_dimensions())
    }

    pub fn apply(&self, src: &Bitmap) -> Result<Bitmap> {
        self.validate(src)?;
        let rotated = if let Some(orientation) = self.fast_orientation() {
            OpOrient90Increments::new(orientation).apply(src)
        } else {
            let tf = self.transform();
            let bounds = find_bounds(src, &tf);
            let (width, height) = bounds.canvas_dimensions();
            let mut dst = Bitmap::new(width, height);
            place_pixels(src, &mut dst, &tf, bounds.shift());
            dst
        };

        debug!(
            angle = self.angle,
            fast_path = self.fast_orientation().is_some(),
            width = rotated.width(),
            height = rotated.height(),
            "rotated bitmap"
        );
        Ok(rotated)
    }

    /// Rotates into `dst`, which must match [`compute_output_dimensions`].
    ///
    /// [`compute_output_dimensions`]: OpRotateBitmap::compute_output_dimensions
    pub fn apply_to_preallocated(&self, src: &Bitmap, dst: &mut Bitmap) -> Result<()> {
        self.validate(src)?;
        if let Some(orientation) = self.fast_orientation() {
            return OpOrient90Increments::new(orientation).apply_to_preallocated(src, dst);
        }

        let tf = self.transform();
        let bounds = find_bounds(src, &tf);
        let (width, height) = bounds.canvas_dimensions();
        if dst.width() != width || dst.height() != height {
            return Err(PbmError::MalformedBitmap {
                expected: width * height,
                actual: dst.width() * dst.height(),
            });
        }
        for y in 0..height {
            dst.row_mut(y).fill(0);
        }
        place_pixels(src, dst, &tf, bounds.shift());
        Ok(())
    }

    fn validate(&self, src: &Bitmap) -> Result<()> {
        if !self.angle.is_finite() {
            return Err(PbmError::InvalidAngle(self.angle));
        }
        if src.is_empty() {
            return Err(PbmError::EmptyBitmap);
        }
        Ok(())
    }

    fn fast_orientation(&self) -> Option<Orientation90> {
        self.quarter_turn.filter(|_| self.fast_path)
    }

    fn transform(&self) -> Transform {
        let (cos, sin) = match self.quarter_turn {
            Some(orientation) => orientation.cos_sin(),
            None => (self.angle.cos(), self.angle.sin()),
        };
        Transform { cos, sin }
    }
}

/// Snaps on the angle's own sine and cosine, so a huge angle whose multiple of
/// π/2 is not representable is never mistaken for a quarter turn.
fn quarter_turn(radians: f64) -> Option<Orientation90> {
    if !radians.is_finite() {
        return None;
    }
    let (sin, cos) = radians.sin_cos();
    let near = |value: f64, target: f64| (value - target).abs() < QUARTER_TURN_EPSILON;
    if near(sin, 0.0) && near(cos, 1.0) {
        Some(Orientation90::Up)
    } else if near(sin, 1.0) && near(cos, 0.0) {
        Some(Orientation90::Left)
    } else if near(sin, 0.0) && near(cos, -1.0) {
        Some(Orientation90::Down)
    } else if near(sin, -1.0) && near(cos, 0.0) {
        Some(Orientation90::Right)
    } else {
        None
    }
}

fn find_bounds(src: &Bitmap, tf: &Transform) -> Bounds {
    let last_i = src.height() - 1;
    let last_j = src.width() - 1;
    [(0, 0), (0, last_j), (last_i, 0), (last_i, last_j)]
        .into_iter()
        .map(|(i, j)| tf.map(i, j))
        .fold(Bounds::default(), Bounds::include)
}

fn place_pixels(src: &Bitmap, dst: &mut Bitmap, tf: &Transform, (shift_x, shift_y): (i64, i64)) {
    for (i, row) in src.rows().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let (x, y) = tf.map(i, j);
            // Bounds come from the same mapping, so both sums are in range.
            let (dst_row, dst_col) = ((x + shift_x) as usize, (y + shift_y) as usize);
            dst.set_pixel(dst_col, dst_row, value);
        }
    }
}

impl Pbm {
    /// Rotates the image in place by `radians` (positive = counter-clockwise).
    ///
    /// The header dimensions follow the new canvas; comments are unchanged.
    pub fn rotate_by_angle(&mut self, radians: f64) -> Result<()> {
        let mut rotate = OpRotateBitmap::new();
        rotate.set_angle(radians);
        self.rotate(&rotate)
    }

    /// Rotates the image in place with a configured operator.
    pub fn rotate(&mut self, rotate: &OpRotateBitmap) -> Result<()> {
        let rotated = rotate.apply(self.bitmap())?;
        self.replace_bitmap(rotated);
        Ok(())
    }
}
