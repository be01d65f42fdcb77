//! Fixed-point position math shared by every strategy that can hand out or
//! borrow a correlated index.
//!
//! A position inside a domain of width `span` is scaled so that the full span
//! covers `[0, 2^32]`. Two fields with unrelated domains can then be lined up
//! by their relative position alone.

/// Relative position of a value inside its domain, scaled by `2^32`.
pub type NormalizedIndex = i64;

/// Slot marker for "this field has no index to share".
pub const NO_INDEX: NormalizedIndex = -1;

const SCALE: f64 = 4_294_967_296.0; // 2^32
const SCALE_MAX: f64 = 4_294_967_295.0; // 2^32 - 1

/// Scales `position / span` by `2^32`.
///
/// A zero span (single entry table, `min == max` range) has only one
/// position, so it always maps to index 0.
pub fn normalize(position: f64, span: f64) -> NormalizedIndex {
    if span == 0.0 {
        return 0;
    }
    (position / span * SCALE).round() as NormalizedIndex
}

/// Inverse of [`normalize`], clamped to `[0, span]`.
///
/// Divides by `2^32 - 1` where `normalize` multiplies by `2^32`, so a round
/// trip lands a hair above the original position and callers have to round.
pub fn denormalize(index: NormalizedIndex, span: f64) -> f64 {
    let fraction = (index as f64 / SCALE_MAX).clamp(0.0, 1.0);
    fraction * span
}
