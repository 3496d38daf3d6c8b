//! Shared helpers for benchmark drivers.

use crate::{Bitmap, Pbm};

pub const BENCH_SIZES: [usize; 4] = [64, 256, 512, 1024];
pub const BENCH_ANGLES: [f64; 7] = [15.0, 30.0, 45.0, 60.0, 90.0, 180.0, 270.0];

/// Builds a bitmap with a diagonal stripe pattern so both pixel values occur.
pub fn create_test_bitmap(width: usize, height: usize) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height);
    for y in 0..height {
        let row = bitmap.row_mut(y);
        for (x, value) in row.iter_mut().enumerate() {
            *value = u8::from((x + y) % 7 < 3);
        }
    }
    bitmap
}

/// Renders a test bitmap as an encoded PBM blob for decoder benchmarks.
pub fn create_test_blob(width: usize, height: usize) -> Vec<u8> {
    Pbm::new(create_test_bitmap(width, height), ["benchmark fixture"]).encode_to_vec()
}
