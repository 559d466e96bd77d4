//! Detection geometry for rendered waterfalls.
//!
//! The defaults match the waterfall renderings produced by the ground-station
//! network: a 12 px title margin on top, a 54 px axis-label margin below, and a
//! signal expected within five columns of the horizontal center. The threshold
//! of 25 green intensity units is empirically tuned against that rendering.
//!
//! Geometry can be loaded from JSON; missing fields keep their defaults:
//!
//! ```rust
//! use waterfall_vet::detection::DetectionGeometry;
//!
//! let geometry: DetectionGeometry = serde_json::from_str(r#"{"threshold": 30.0}"#).unwrap();
//! assert_eq!(geometry.threshold, 30.0);
//! assert_eq!(geometry.margin_top, 12);
//! assert_eq!(geometry.band_width(), 11);
//! ```

use super::segment::SEGMENT_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum spike height above the noise floor, in green intensity units
pub const DEFAULT_THRESHOLD: f64 = 25.0;
/// Rows skipped at the top of the rendering (title strip)
pub const DEFAULT_MARGIN_TOP: usize = 12;
/// Rows skipped at the bottom of the rendering (axis labels)
pub const DEFAULT_MARGIN_BOTTOM: usize = 54;
/// Columns on either side of a band's center column
pub const DEFAULT_BAND_HALF_WIDTH: usize = 5;

/// Errors raised while reading or writing a geometry file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access geometry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse geometry file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where to look in a waterfall and how large a spike must be.
///
/// Column positions default to fractions of the image width and are resolved
/// per image by [`DetectionGeometry::resolve_columns`]. Explicit columns
/// override the fractions for renderings whose tracked frequency is off-center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionGeometry {
    /// Columns on either side of each band's center column
    pub band_half_width: usize,
    /// Rows excluded at the top of the image
    pub margin_top: usize,
    /// Rows excluded at the bottom of the image
    pub margin_bottom: usize,
    /// Required excess of a segment peak over the noise floor
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_column: Option<usize>,
}

/// Center and control columns resolved for one image width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandColumns {
    pub center: usize,
    pub left: usize,
    pub right: usize,
}

impl Default for DetectionGeometry {
    fn default() -> Self {
        Self {
            band_half_width: DEFAULT_BAND_HALF_WIDTH,
            margin_top: DEFAULT_MARGIN_TOP,
            margin_bottom: DEFAULT_MARGIN_BOTTOM,
            threshold: DEFAULT_THRESHOLD,
            center_column: None,
            left_column: None,
            right_column: None,
        }
    }
}

impl DetectionGeometry {
    /// Number of columns a band spans before clipping
    pub fn band_width(&self) -> usize {
        self.band_half_width.saturating_mul(2).saturating_add(1)
    }

    /// Smallest image height that leaves one row for each profile segment
    pub fn min_height(&self) -> usize {
        self.margin_top
            .saturating_add(self.margin_bottom)
            .saturating_add(SEGMENT_COUNT)
    }

    /// Image rows contributing to the profile, or `None` if the image is too short
    pub fn analyzed_rows(&self, height: usize) -> Option<Range<usize>> {
        (height >= self.min_height()).then(|| self.margin_top..height - self.margin_bottom)
    }

    /// Resolve band columns for an image `width` pixels wide.
    ///
    /// Defaults are `width / 2` for the center and `width / 4`, `3 * (width / 4)`
    /// for the controls.
    ///
    /// # Examples
    /// ```rust
    /// use waterfall_vet::detection::{BandColumns, DetectionGeometry};
    ///
    /// let columns = DetectionGeometry::default().resolve_columns(623);
    /// assert_eq!(columns, BandColumns { center: 311, left: 155, right: 465 });
    /// ```
    pub fn resolve_columns(&self, width: usize) -> BandColumns {
        let quarter = width / 4;
        BandColumns {
            center: self.center_column.unwrap_or(width / 2),
            left: self.left_column.unwrap_or(quarter),
            right: self.right_column.unwrap_or(quarter * 3),
        }
    }

    /// Load geometry from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save geometry to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for DetectionGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "band {} px, margins {}/{} px, threshold {:.1}",
            self.band_width(),
            self.margin_top,
            self.margin_bottom,
            self.threshold
        )
    }
}
