//! Common odds and ends shared across the crate.

pub use self::error::{CmnError, CmnResult};
pub use self::map_store::{MapStore, MapStoreIter};

mod error;
mod map_store;

/// Tolerance used when checking that a set of weights or ratios sums to 1.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1.0e-4;

/// Tolerance used when comparing voxel dimensions and offsets of
/// jointly-used fields.
pub const GEOMETRY_TOLERANCE: f32 = 1.0e-5;

/// Approximate float equality within `tol`.
#[inline]
pub fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}
