//! Decoded RGB rasters.
//!
//! Waterfalls arrive as PNG renderings. They are decoded once into an 8-bit RGB
//! buffer laid out as `(height, width, channel)`, so that a single channel of a
//! single row is a contiguous-stride view that band reductions can slice directly.

use image::RgbImage;
use ndarray::{s, Array3, ArrayView1};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of channels per pixel
pub const CHANNELS: usize = 3;
/// Red channel index
pub const RED: usize = 0;
/// Green channel index
pub const GREEN: usize = 1;
/// Blue channel index
pub const BLUE: usize = 2;

/// Errors raised while turning a file or buffer into a [`RasterImage`].
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Pixel buffer of shape {shape:?} is not (height, width, 3)")]
    UnsupportedLayout { shape: Vec<usize> },
}

/// Immutable 8-bit RGB raster.
///
/// Width and height are fixed at construction. The detector only ever borrows
/// a raster, so one decoded image can be shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: Array3<u8>,
}

impl RasterImage {
    /// Decode an image file and convert it to 8-bit RGB.
    ///
    /// Palette, grayscale and alpha images are converted; anything the `image`
    /// crate cannot decode is reported as [`ImageLoadError::Decode`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageLoadError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ImageLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_rgb(decoded.to_rgb8())
    }

    /// Wrap an already decoded RGB image
    pub fn from_rgb(image: RgbImage) -> Result<Self, ImageLoadError> {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let pixels = Array3::from_shape_vec((height, width, CHANNELS), image.into_raw())
            .map_err(|_| ImageLoadError::UnsupportedLayout {
                shape: vec![height, width, CHANNELS],
            })?;
        Ok(Self { pixels })
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> [u8; CHANNELS],
    {
        let pixels = Array3::from_shape_fn((height, width, CHANNELS), |(y, x, c)| f(x, y)[c]);
        Self { pixels }
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    /// RGB triple at column `x`, row `y`
    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        [
            self.pixels[[y, x, RED]],
            self.pixels[[y, x, GREEN]],
            self.pixels[[y, x, BLUE]],
        ]
    }

    /// One channel of one row, indexed by column
    pub fn channel_row(&self, y: usize, channel: usize) -> ArrayView1<'_, u8> {
        self.pixels.slice(s![y, .., channel])
    }
}
