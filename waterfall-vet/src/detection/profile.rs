//! Intensity profile extraction.
//!
//! For every analyzed row the green channel is averaged over three column
//! bands: one around the expected signal column and two control bands at a
//! quarter and three quarters of the width. The row's sample is the center mean
//! minus the average of the control means. Broadband interference lights up all
//! three bands together and cancels; a narrowband transmitter on the tracked
//! frequency only lights up the center band.

use super::config::{BandColumns, DetectionGeometry};
use super::error::DetectionError;
use crate::image_proc::{band_mean, band_range, RasterImage, GREEN};
use log::debug;
use serde::Serialize;
use std::ops::Range;

/// Background-corrected center-band intensity, one sample per analyzed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityProfile {
    first_row: usize,
    samples: Vec<f64>,
}

impl IntensityProfile {
    /// Create a profile whose first sample belongs to image row `first_row`
    pub fn new(first_row: usize, samples: Vec<f64>) -> Self {
        Self { first_row, samples }
    }

    /// Image row of the first sample
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Image rows covered by the profile
    pub fn rows(&self) -> Range<usize> {
        self.first_row..self.first_row + self.samples.len()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(image row, sample)` pairs in row order
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows().zip(self.samples.iter().copied())
    }
}

/// Column ranges of the three bands after clipping to the image
#[derive(Debug, Clone, PartialEq, Eq)]
struct BandWindows {
    center: Range<usize>,
    left: Range<usize>,
    right: Range<usize>,
}

fn resolve_windows(
    columns: BandColumns,
    half_width: usize,
    width: usize,
) -> Result<BandWindows, DetectionError> {
    let window = |name: &str, column: usize| {
        band_range(column, half_width, width).ok_or_else(|| {
            DetectionError::InvalidGeometry(format!(
                "{name} band at column {column} has no columns inside an image {width} px wide"
            ))
        })
    };

    Ok(BandWindows {
        center: window("center", columns.center)?,
        left: window("left control", columns.left)?,
        right: window("right control", columns.right)?,
    })
}

/// Extract the background-corrected green profile of `image`.
///
/// # Errors
/// * [`DetectionError::InvalidGeometry`] if the image has no columns, the band is
///   at least as wide as the image, or a band falls entirely outside the image
/// * [`DetectionError::InsufficientData`] if fewer than three rows remain after
///   the margins
pub fn extract_profile(
    image: &RasterImage,
    geometry: &DetectionGeometry,
) -> Result<IntensityProfile, DetectionError> {
    let width = image.width();
    let height = image.height();

    if width == 0 {
        return Err(DetectionError::InvalidGeometry(
            "image has zero width".to_string(),
        ));
    }
    if geometry.band_width() >= width {
        return Err(DetectionError::InvalidGeometry(format!(
            "band width {} px does not fit an image {width} px wide",
            geometry.band_width()
        )));
    }
    if !geometry.threshold.is_finite() {
        return Err(DetectionError::InvalidGeometry(format!(
            "threshold {} is not finite",
            geometry.threshold
        )));
    }

    let rows = geometry
        .analyzed_rows(height)
        .ok_or(DetectionError::InsufficientData {
            height,
            min_height: geometry.min_height(),
        })?;

    let columns = geometry.resolve_columns(width);
    let windows = resolve_windows(columns, geometry.band_half_width, width)?;
    debug!(
        "Profiling {}x{} image: rows {:?}, center {:?}, controls {:?} / {:?}",
        width, height, rows, windows.center, windows.left, windows.right
    );

    let first_row = rows.start;
    let samples = rows
        .map(|y| {
            let green = image.channel_row(y, GREEN);
            let center = band_mean(green, windows.center.clone());
            let left = band_mean(green, windows.left.clone());
            let right = band_mean(green, windows.right.clone());
            center - (left + right) / 2.0
        })
        .collect();

    Ok(IntensityProfile::new(first_row, samples))
}
