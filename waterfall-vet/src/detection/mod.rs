//! Narrowband transit detection for waterfall images
//!
//! Detection runs in two steps:
//!
//! 1. [`extract_profile`] reduces the image to one background-corrected green
//!    intensity per analyzed row.
//! 2. [`decide`] compares the peaks of the first and last thirds of that profile
//!    against its mean.
//!
//! [`detect`] chains both and is a pure function of the image and geometry, so it
//! can be called from any number of worker threads on independent images.
//! [`detect_with_sink`] additionally hands the result to a [`DiagnosticSink`].

pub mod config;
pub mod error;
pub mod profile;
pub mod segment;
pub mod sink;
pub mod verdict;

pub use config::{BandColumns, ConfigError, DetectionGeometry};
pub use error::DetectionError;
pub use profile::{extract_profile, IntensityProfile};
pub use segment::{segment_lengths, split_segments, SEGMENT_COUNT};
pub use sink::{DiagnosticSink, SinkError};
pub use verdict::{decide, SegmentPeak, Verdict};

use crate::image_proc::RasterImage;
use log::{debug, warn};
use serde::Serialize;

/// Verdict together with the profile it was derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub verdict: Verdict,
    pub profile: IntensityProfile,
}

/// Vet a single waterfall.
///
/// # Errors
/// See [`extract_profile`] and [`decide`].
pub fn detect(
    image: &RasterImage,
    geometry: &DetectionGeometry,
) -> Result<Detection, DetectionError> {
    let profile = extract_profile(image, geometry)?;
    let verdict = decide(&profile, geometry.threshold)?;

    debug!(
        "Noise floor {:.3}, first peak {:.3} (row {}), third peak {:.3} (row {}) -> {}",
        verdict.noise_floor,
        verdict.first.max,
        verdict.first.peak_row,
        verdict.third.max,
        verdict.third.peak_row,
        verdict.is_signal
    );

    Ok(Detection { verdict, profile })
}

/// Vet a single waterfall and report the result to `sink`.
///
/// The returned detection is identical to [`detect`]; sink failures are logged.
pub fn detect_with_sink(
    image: &RasterImage,
    geometry: &DetectionGeometry,
    sink: &mut dyn DiagnosticSink,
) -> Result<Detection, DetectionError> {
    let detection = detect(image, geometry)?;
    if let Err(e) = sink.record(&detection.profile, &detection.verdict) {
        warn!("Diagnostic sink failed: {e}");
    }
    Ok(detection)
}
