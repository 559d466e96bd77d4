//! Batch vetting of waterfall directories.
//!
//! Every waterfall is vetted independently, so classification runs on the rayon
//! pool with one decoded image per worker. A file that cannot be decoded or
//! vetted becomes a [`FileOutcome::Failed`] entry and the run continues; only
//! problems with the run itself (missing root, unwritable report) are errors.

pub mod candidates;
pub mod summary;

pub use candidates::{discover_candidates, BatchOptions};
pub use summary::{BatchSummary, FileOutcome};

use crate::detection::{detect, detect_with_sink, DetectionError, DetectionGeometry, Verdict};
use crate::image_proc::{ImageLoadError, RasterImage};
use crate::viz::ProfilePlotter;
use indicatif::ProgressBar;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Run-level failures
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Waterfall directory {0} does not exist")]
    RootNotFound(PathBuf),
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Reasons a single file could not be vetted
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Decode(#[from] ImageLoadError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
}

/// Decode and vet one waterfall, optionally plotting its profile beside it.
pub fn classify_file(
    path: &Path,
    geometry: &DetectionGeometry,
    plot: bool,
) -> Result<Verdict, FileError> {
    let image = RasterImage::open(path)?;
    let detection = if plot {
        let mut plotter = ProfilePlotter::beside(path, geometry.band_width());
        detect_with_sink(&image, geometry, &mut plotter)?
    } else {
        detect(&image, geometry)?
    };
    Ok(detection.verdict)
}

/// Vet `paths` in parallel, returning outcomes in the order of `paths`.
pub fn classify_all(
    paths: &[PathBuf],
    geometry: &DetectionGeometry,
    plot: bool,
    progress: &ProgressBar,
) -> Vec<FileOutcome> {
    info!("Vetting {} waterfalls ({})", paths.len(), geometry);

    paths
        .par_iter()
        .map(|path| {
            let outcome = match classify_file(path, geometry, plot) {
                Ok(verdict) => FileOutcome::Classified {
                    path: path.clone(),
                    verdict,
                },
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    FileOutcome::Failed {
                        path: path.clone(),
                        error: e.to_string(),
                    }
                }
            };
            progress.inc(1);
            outcome
        })
        .collect()
}

/// Everything a vetting run produced, for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub geometry: DetectionGeometry,
    pub files: Vec<FileOutcome>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn new(root: PathBuf, geometry: DetectionGeometry, files: Vec<FileOutcome>) -> Self {
        let summary = BatchSummary::from_outcomes(&files);
        Self {
            root,
            geometry,
            files,
            summary,
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<(), BatchError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::WaterfallBuilder;

    fn write_waterfall(path: &Path, signal: bool) {
        let geometry = DetectionGeometry::default();
        let top = geometry.margin_top;
        let mut builder = WaterfallBuilder::new(80, geometry.min_height() + 27)
            .margins(geometry.margin_top, geometry.margin_bottom)
            .row_noise(15, 21);
        if signal {
            builder = builder
                .elevate_rows(top + 2..top + 5, 90)
                .elevate_rows(top + 24..top + 28, 90);
        }
        let image = builder.build();

        let mut rgb = image::RgbImage::new(image.width() as u32, image.height() as u32);
        for (x, y, pixel) in rgb.enumerate_pixels_mut() {
            *pixel = image::Rgb(image.pixel(x as usize, y as usize));
        }
        rgb.save(path).unwrap();
    }

    #[test]
    fn test_classify_file() {
        let dir = tempfile::tempdir().unwrap();
        let signal = dir.path().join("signal.png");
        let quiet = dir.path().join("quiet.png");
        write_waterfall(&signal, true);
        write_waterfall(&quiet, false);

        let geometry = DetectionGeometry::default();
        assert!(classify_file(&signal, &geometry, false).unwrap().is_signal);
        assert!(!classify_file(&quiet, &geometry, false).unwrap().is_signal);
    }

    #[test]
    fn test_plot_is_written_and_not_rediscovered() {
        let dir = tempfile::tempdir().unwrap();
        let waterfall = dir.path().join("w.png");
        write_waterfall(&waterfall, true);

        let verdict = classify_file(&waterfall, &DetectionGeometry::default(), true).unwrap();
        assert!(verdict.is_signal);
        assert!(dir.path().join("w_out.png").is_file());

        let candidates = discover_candidates(&BatchOptions::new(dir.path())).unwrap();
        assert_eq!(candidates, vec![waterfall]);
    }

    #[test]
    fn test_failures_do_not_abort_run() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.png");
        let broken = dir.path().join("b.png");
        let short = dir.path().join("c.png");
        write_waterfall(&good, true);
        std::fs::write(&broken, b"garbage").unwrap();
        image::RgbImage::new(80, 20).save(&short).unwrap();

        let paths = vec![good.clone(), broken.clone(), short.clone()];
        let outcomes = classify_all(
            &paths,
            &DetectionGeometry::default(),
            false,
            &ProgressBar::hidden(),
        );

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].path(), good.as_path());
        assert!(outcomes[0].verdict().unwrap().is_signal);
        assert!(matches!(outcomes[1], FileOutcome::Failed { .. }));
        assert!(matches!(outcomes[2], FileOutcome::Failed { .. }));

        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!((summary.total, summary.signal, summary.failed), (1, 1, 2));
    }

    #[test]
    fn test_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = BatchReport::new(
            dir.path().to_path_buf(),
            DetectionGeometry::default(),
            vec![FileOutcome::Failed {
                path: PathBuf::from("x.png"),
                error: "broken".to_string(),
            }],
        );
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["summary"]["total"], 0);
        assert_eq!(value["files"][0]["status"], "failed");
        assert_eq!(value["geometry"]["threshold"], 25.0);
    }
}
