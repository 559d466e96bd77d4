use crate::stats_scan::StatsError;
use thiserror::Error;

/// Reasons a waterfall cannot be vetted.
///
/// Every variant is terminal for the image under evaluation; batch callers
/// record it and move on to the next file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// Too few rows remain after margins to fill every profile segment
    #[error("Image height {height} is below the minimum of {min_height} rows for the configured margins")]
    InsufficientData { height: usize, min_height: usize },

    /// A profile too short to split into three non-empty segments
    #[error("Profile of {samples} samples is below the minimum of {min_samples} samples")]
    ShortProfile { samples: usize, min_samples: usize },

    /// Bands cannot be placed on the image as configured
    #[error("Invalid detection geometry: {0}")]
    InvalidGeometry(String),

    #[error("Profile statistics failed: {0}")]
    Statistics(#[from] StatsError),
}
