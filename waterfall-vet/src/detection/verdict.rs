//! The vetting decision rule.
//!
//! A satellite on the tracked frequency is visible for the whole pass, so its
//! trace produces spikes near the start and near the end of the recording.
//! Other satellites sweep across the band and usually cross the center column
//! around mid-pass. The rule therefore looks only at the first and last third of
//! the profile and requires both to peak above the noise floor by more than the
//! threshold. The middle third is summarized for diagnostics but never decides.

use super::error::DetectionError;
use super::profile::IntensityProfile;
use super::segment::{split_segments, SEGMENT_COUNT};
use crate::stats_scan::StatsScan;
use serde::Serialize;
use std::fmt;

/// Peak of one profile segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentPeak {
    /// Image row of the first sample in the segment
    pub start_row: usize,
    /// Number of samples in the segment
    pub len: usize,
    /// Image row holding the segment maximum
    pub peak_row: usize,
    /// Segment maximum
    pub max: f64,
}

impl SegmentPeak {
    /// Height of the peak above `noise_floor`
    pub fn excess(&self, noise_floor: f64) -> f64 {
        self.max - noise_floor
    }
}

/// Outcome of vetting one waterfall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    /// Both outer segments are hot
    pub is_signal: bool,
    /// Mean of the whole profile
    pub noise_floor: f64,
    /// Threshold the segment peaks were compared against
    pub threshold: f64,
    pub first_hot: bool,
    pub third_hot: bool,
    pub first: SegmentPeak,
    pub middle: SegmentPeak,
    pub third: SegmentPeak,
}

fn segment_peak(segment: &[f64], start_row: usize) -> Result<SegmentPeak, DetectionError> {
    let peak = StatsScan::new(segment).peak()?;
    Ok(SegmentPeak {
        start_row,
        len: segment.len(),
        peak_row: start_row + peak.index,
        max: peak.value,
    })
}

/// Apply the decision rule to an extracted profile.
///
/// # Errors
/// * [`DetectionError::ShortProfile`] if any segment would be empty
/// * [`DetectionError::Statistics`] if the profile contains NaN
pub fn decide(profile: &IntensityProfile, threshold: f64) -> Result<Verdict, DetectionError> {
    let samples = profile.samples();
    let [first, middle, third] = split_segments(samples);
    if third.is_empty() {
        return Err(DetectionError::ShortProfile {
            samples: samples.len(),
            min_samples: SEGMENT_COUNT,
        });
    }

    let noise_floor = StatsScan::new(samples).mean()?;

    let first_start = profile.first_row();
    let middle_start = first_start + first.len();
    let third_start = middle_start + middle.len();

    let first = segment_peak(first, first_start)?;
    let middle = segment_peak(middle, middle_start)?;
    let third = segment_peak(third, third_start)?;

    let first_hot = first.excess(noise_floor) > threshold;
    let third_hot = third.excess(noise_floor) > threshold;

    Ok(Verdict {
        is_signal: first_hot && third_hot,
        noise_floor,
        threshold,
        first_hot,
        third_hot,
        first,
        middle,
        third,
    })
}

/// Tab-separated `[first_hot, third_hot]`, noise floor and decision
impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]\t{:.4}\t{}",
            self.first_hot, self.third_hot, self.noise_floor, self.is_signal
        )
    }
}
