//! Synthetic waterfall generation for tests and tuning.
//!
//! Builds RGB rasters that mimic the ground-station renderings: white margin
//! strips, a flat background, optional broadband interference that brightens
//! whole rows at once, and narrowband transmissions confined to the center band.

use crate::detection::config::DEFAULT_BAND_HALF_WIDTH;
use crate::image_proc::{band_range, RasterImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

/// Flat background level on every channel
const BACKGROUND: u8 = 40;

/// Builder for synthetic waterfalls
#[derive(Debug, Clone)]
pub struct WaterfallBuilder {
    width: usize,
    height: usize,
    margin_top: usize,
    margin_bottom: usize,
    center_column: Option<usize>,
    band_half_width: usize,
    row_noise: Option<(u8, u64)>,
    elevated: Vec<(Range<usize>, u8)>,
}

impl WaterfallBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            margin_top: 0,
            margin_bottom: 0,
            center_column: None,
            band_half_width: DEFAULT_BAND_HALF_WIDTH,
            row_noise: None,
            elevated: Vec::new(),
        }
    }

    /// Paint `top` and `bottom` rows white, like the rendered title and axis strips
    pub fn margins(mut self, top: usize, bottom: usize) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Column and half width of the transmission band (defaults to the image center)
    pub fn signal_band(mut self, center_column: usize, half_width: usize) -> Self {
        self.center_column = Some(center_column);
        self.band_half_width = half_width;
        self
    }

    /// Add a seeded offset in `0..=amplitude` to every pixel of each row.
    ///
    /// Models broadband interference, which brightens a whole row at once.
    pub fn row_noise(mut self, amplitude: u8, seed: u64) -> Self {
        self.row_noise = Some((amplitude, seed));
        self
    }

    /// Raise the green channel of the signal band by `boost` on image `rows`
    pub fn elevate_rows(mut self, rows: Range<usize>, boost: u8) -> Self {
        self.elevated.push((rows, boost));
        self
    }

    pub fn build(&self) -> RasterImage {
        let row_offsets: Vec<u8> = match self.row_noise {
            Some((amplitude, seed)) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                (0..self.height).map(|_| rng.gen_range(0..=amplitude)).collect()
            }
            None => vec![0; self.height],
        };

        let center = self.center_column.unwrap_or(self.width / 2);
        let band = band_range(center, self.band_half_width, self.width).unwrap_or(0..0);
        let body = self.margin_top..self.height.saturating_sub(self.margin_bottom);

        RasterImage::from_fn(self.width, self.height, |x, y| {
            if !body.contains(&y) {
                return [255, 255, 255];
            }

            let base = BACKGROUND.saturating_add(row_offsets[y]);
            let boost: u8 = if band.contains(&x) {
                self.elevated
                    .iter()
                    .filter(|(rows, _)| rows.contains(&y))
                    .fold(0u8, |acc, &(_, boost)| acc.saturating_add(boost))
            } else {
                0
            };

            [base / 2, base.saturating_add(boost), base]
        })
    }
}
