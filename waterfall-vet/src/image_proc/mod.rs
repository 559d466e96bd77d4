//! Image processing primitives for waterfall analysis
//!
//! This module holds the decoded raster type consumed by the detector and the
//! column-band reductions it is built on.

pub mod band;
pub mod raster;

pub use band::{band_mean, band_range};
pub use raster::{ImageLoadError, RasterImage, BLUE, CHANNELS, GREEN, RED};
