//! Temporal segmentation of a profile.
//!
//! The profile is cut into three contiguous parts in row order. When the length
//! is not a multiple of three the leftover samples go to the earliest segments,
//! so segment lengths never differ by more than one.

/// Number of temporal segments a profile is split into
pub const SEGMENT_COUNT: usize = 3;

/// Lengths of the three segments for a profile of `len` samples.
///
/// ```rust
/// use waterfall_vet::detection::segment_lengths;
///
/// assert_eq!(segment_lengths(9), [3, 3, 3]);
/// assert_eq!(segment_lengths(10), [4, 3, 3]);
/// assert_eq!(segment_lengths(11), [4, 4, 3]);
/// ```
pub fn segment_lengths(len: usize) -> [usize; SEGMENT_COUNT] {
    let base = len / SEGMENT_COUNT;
    let remainder = len % SEGMENT_COUNT;
    std::array::from_fn(|i| base + usize::from(i < remainder))
}

/// Split `values` into first, middle and third segments.
pub fn split_segments<T>(values: &[T]) -> [&[T]; SEGMENT_COUNT] {
    let [first_len, middle_len, _] = segment_lengths(values.len());
    let (first, rest) = values.split_at(first_len);
    let (middle, third) = rest.split_at(middle_len);
    [first, middle, third]
}
