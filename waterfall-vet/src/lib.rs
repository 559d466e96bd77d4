//! Heuristic vetting of ground-station waterfall images.
//!
//! A waterfall is a time/frequency raster where a satellite transmitting on the
//! tracked frequency shows up as a bright vertical trace along the center column.
//! This crate decides whether such a trace is present by comparing the green
//! channel along the center band against two parallel control bands, then
//! checking the first and last thirds of the observation window for spikes
//! above the noise floor.
//!
//! # Modules
//!
//! - [`image_proc`]: decoded RGB rasters and band reductions
//! - [`detection`]: geometry, profile extraction and the decision rule
//! - [`stats_scan`]: single-pass statistics used by the decision rule
//! - [`viz`]: diagnostic plots of the intensity profile
//! - [`batch`]: directory traversal and aggregate reporting
//! - [`test_util`]: synthetic waterfall generation
//!
//! # Usage
//!
//! ```rust
//! use waterfall_vet::detection::{detect, DetectionGeometry};
//! use waterfall_vet::test_util::WaterfallBuilder;
//!
//! let geometry = DetectionGeometry::default();
//! let image = WaterfallBuilder::new(64, geometry.min_height() + 27)
//!     .margins(geometry.margin_top, geometry.margin_bottom)
//!     .build();
//!
//! let detection = detect(&image, &geometry).unwrap();
//! assert!(!detection.verdict.is_signal);
//! assert_eq!(detection.profile.len(), 30);
//! ```

pub mod batch;
pub mod detection;
pub mod image_proc;
pub mod stats_scan;
pub mod test_util;
pub mod viz;

pub use detection::{
    detect, detect_with_sink, Detection, DetectionError, DetectionGeometry, Verdict,
};
pub use image_proc::{ImageLoadError, RasterImage};
