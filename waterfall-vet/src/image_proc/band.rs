//! Column-band reductions.
//!
//! A band is a window of `2 * half_width + 1` columns centered on a column of
//! interest. Windows that run past an image edge are clipped, never padded.

use ndarray::{s, ArrayView1};
use std::ops::Range;

/// Columns covered by a band, clipped to `[0, width)`.
///
/// Returns `None` when no column of the band lies inside the image.
///
/// # Examples
/// ```rust
/// use waterfall_vet::image_proc::band_range;
///
/// assert_eq!(band_range(50, 5, 100), Some(45..56));
/// assert_eq!(band_range(2, 5, 100), Some(0..8));
/// assert_eq!(band_range(120, 5, 100), None);
/// ```
pub fn band_range(center: usize, half_width: usize, width: usize) -> Option<Range<usize>> {
    let start = center.saturating_sub(half_width);
    let end = center.saturating_add(half_width).saturating_add(1).min(width);
    (start < end).then_some(start..end)
}

/// Mean of `row` over `range`.
///
/// Sums in integer space so the result does not depend on summation order.
/// The caller guarantees a non-empty range inside the row.
pub fn band_mean(row: ArrayView1<'_, u8>, range: Range<usize>) -> f64 {
    let count = range.len();
    let sum = row
        .slice(s![range])
        .fold(0u64, |acc, &value| acc + u64::from(value));
    sum as f64 / count as f64
}
