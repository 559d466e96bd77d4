//! Line plots of the background-corrected center-band profile.
//!
//! One PNG per vetted waterfall, written next to the source image as
//! `<stem>_out.png`. The plot shows the profile against image row, the noise
//! floor, the detection level (noise floor plus threshold) and the boundaries
//! of the three temporal segments, so a reviewer can see why a waterfall was
//! accepted or rejected.

use crate::detection::{DiagnosticSink, IntensityProfile, SinkError, Verdict};
use log::debug;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default vertical range; widened when the profile leaves it
const DEFAULT_Y_RANGE: (f64, f64) = (-20.0, 100.0);

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Profile is empty, nothing to plot")]
    EmptyProfile,
    #[error("Failed to render plot {path}: {message}")]
    Render { path: PathBuf, message: String },
}

/// Diagnostic plot path for a source image: `dir/name.png` -> `dir/name_out.png`
///
/// ```rust
/// use std::path::Path;
/// use waterfall_vet::viz::derive_plot_path;
///
/// assert_eq!(
///     derive_plot_path(Path::new("obs/waterfall_123.png")),
///     Path::new("obs/waterfall_123_out.png")
/// );
/// ```
pub fn derive_plot_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}_out.png"))
}

/// Vertical plot range covering the default window, the profile and the detection level
fn y_range(profile: &IntensityProfile, verdict: &Verdict) -> (f64, f64) {
    let detection_level = verdict.noise_floor + verdict.threshold;
    profile
        .samples()
        .iter()
        .copied()
        .chain([verdict.noise_floor, detection_level])
        .filter(|v| v.is_finite())
        .fold(DEFAULT_Y_RANGE, |(lo, hi), v| (lo.min(v - 5.0), hi.max(v + 5.0)))
}

/// Renders profile plots to PNG files.
#[derive(Debug, Clone)]
pub struct ProfilePlotter {
    output_path: PathBuf,
    size: (u32, u32),
    band_width: usize,
}

impl ProfilePlotter {
    /// Plot to `output_path`; `band_width` is only used in the title
    pub fn new(output_path: PathBuf, band_width: usize) -> Self {
        Self {
            output_path,
            size: (2400, 1200),
            band_width,
        }
    }

    /// Plot next to `source` using [`derive_plot_path`]
    pub fn beside(source: &Path, band_width: usize) -> Self {
        Self::new(derive_plot_path(source), band_width)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn render_error<E: std::fmt::Display>(&self, error: E) -> PlotError {
        PlotError::Render {
            path: self.output_path.clone(),
            message: error.to_string(),
        }
    }

    /// Render the plot
    pub fn render(&self, profile: &IntensityProfile, verdict: &Verdict) -> Result<(), PlotError> {
        if profile.is_empty() {
            return Err(PlotError::EmptyProfile);
        }

        let rows = profile.rows();
        let x_range = rows.start as f64..rows.end as f64;
        let (y_min, y_max) = y_range(profile, verdict);

        let root = BitMapBackend::new(&self.output_path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| self.render_error(e))?;
        let root = root.margin(20, 20, 20, 20);

        let caption = format!(
            "Mean green value at center line (width {} px): signal = {}",
            self.band_width, verdict.is_signal
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 32).into_font().color(&BLACK))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range.clone(), y_min..y_max)
            .map_err(|e| self.render_error(e))?;

        chart
            .configure_mesh()
            .x_desc("Pixel position (y)")
            .y_desc("Intensity (mean over band)")
            .axis_desc_style(("sans-serif", 20))
            .label_style(("sans-serif", 16))
            .draw()
            .map_err(|e| self.render_error(e))?;

        // Segment boundaries
        let boundaries = [verdict.middle.start_row, verdict.third.start_row];
        chart
            .draw_series(boundaries.iter().map(|&row| {
                PathElement::new(
                    vec![(row as f64, y_min), (row as f64, y_max)],
                    RGBColor(160, 160, 160).stroke_width(1),
                )
            }))
            .map_err(|e| self.render_error(e))?;

        chart
            .draw_series(LineSeries::new(
                profile.points().map(|(row, value)| (row as f64, value)),
                GREEN.stroke_width(2),
            ))
            .map_err(|e| self.render_error(e))?
            .label("Green")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![
                    (x_range.start, verdict.noise_floor),
                    (x_range.end, verdict.noise_floor),
                ],
                BLUE,
            )))
            .map_err(|e| self.render_error(e))?
            .label("Noise floor")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        let detection_level = verdict.noise_floor + verdict.threshold;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![
                    (x_range.start, detection_level),
                    (x_range.end, detection_level),
                ],
                RED,
            )))
            .map_err(|e| self.render_error(e))?
            .label("Detection level")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .label_font(("sans-serif", 18))
            .draw()
            .map_err(|e| self.render_error(e))?;

        root.present().map_err(|e| self.render_error(e))?;
        debug!("Stored profile plot {}", self.output_path.display());

        Ok(())
    }
}

impl DiagnosticSink for ProfilePlotter {
    fn record(&mut self, profile: &IntensityProfile, verdict: &Verdict) -> Result<(), SinkError> {
        self.render(profile, verdict)?;
        Ok(())
    }
}
