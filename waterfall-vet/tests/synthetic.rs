//! End-to-end vetting of synthetic waterfall directories

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use waterfall_vet::batch::{
    classify_all, discover_candidates, BatchOptions, BatchReport, BatchSummary,
};
use waterfall_vet::detection::{detect, DetectionGeometry};
use waterfall_vet::RasterImage;

const WIDTH: usize = 200;
const PROFILE_ROWS: usize = 150;
/// A beacon transmits for `BURST_ROWS` rows out of every `BEACON_PERIOD`
const BEACON_PERIOD: usize = 15;
const BURST_ROWS: usize = 2;

/// Trace drawn into a synthetic waterfall
#[derive(Clone, Copy)]
enum Trace {
    None,
    /// Beacon bursts on the center column throughout the pass
    Transit { amplitude: f64 },
    /// Frequency drifting across the band, crossing the center mid-pass
    Sweep { amplitude: f64 },
}

/// Render a waterfall with per-pixel noise, white margins and an optional trace
fn create_waterfall(geometry: &DetectionGeometry, trace: Trace, seed: u64) -> RasterImage {
    let height = geometry.margin_top + PROFILE_ROWS + geometry.margin_bottom;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut green = Array2::<f64>::zeros((height, WIDTH));
    for value in green.iter_mut() {
        *value = 50.0 + rng.gen_range(-8.0..8.0);
    }

    // Broadband bursts brighten whole rows
    for _ in 0..6 {
        let row = rng.gen_range(0..height);
        green.row_mut(row).mapv_inplace(|v| v + 60.0);
    }

    let center = WIDTH as f64 / 2.0;
    for y in geometry.margin_top..geometry.margin_top + PROFILE_ROWS {
        let row = y - geometry.margin_top;
        let t = row as f64 / PROFILE_ROWS as f64;
        let (column, amplitude) = match trace {
            Trace::None => continue,
            Trace::Transit { .. } if row % BEACON_PERIOD >= BURST_ROWS => continue,
            Trace::Transit { amplitude } => (center, amplitude),
            Trace::Sweep { amplitude } => (center + (t - 0.5) * 4.0 * WIDTH as f64, amplitude),
        };

        for x in 0..WIDTH {
            let dx = x as f64 - column;
            green[[y, x]] += amplitude * (-dx * dx / (2.0 * 2.0 * 2.0)).exp();
        }
    }

    RasterImage::from_fn(WIDTH, height, |x, y| {
        if y < geometry.margin_top || y >= height - geometry.margin_bottom {
            return [255, 255, 255];
        }
        let g = green[[y, x]].round().clamp(0.0, 255.0) as u8;
        [g / 3, g, g / 2]
    })
}

fn save_png(image: &RasterImage, path: &Path) {
    let mut rgb = image::RgbImage::new(image.width() as u32, image.height() as u32);
    for (x, y, pixel) in rgb.enumerate_pixels_mut() {
        *pixel = image::Rgb(image.pixel(x as usize, y as usize));
    }
    rgb.save(path).unwrap();
}

#[test]
fn test_transit_is_detected_despite_noise() {
    let geometry = DetectionGeometry::default();
    let image = create_waterfall(&geometry, Trace::Transit { amplitude: 120.0 }, 1);

    let detection = detect(&image, &geometry).unwrap();
    assert_eq!(detection.profile.len(), PROFILE_ROWS);
    assert!(detection.verdict.is_signal);
}

#[test]
fn test_sweep_is_rejected() {
    let geometry = DetectionGeometry::default();
    let image = create_waterfall(&geometry, Trace::Sweep { amplitude: 150.0 }, 2);

    let verdict = detect(&image, &geometry).unwrap().verdict;
    assert!(verdict.middle.max - verdict.noise_floor > geometry.threshold);
    assert!(!verdict.is_signal);
}

#[test]
fn test_broadband_noise_alone_is_rejected() {
    let geometry = DetectionGeometry::default();
    for seed in 0..5 {
        let image = create_waterfall(&geometry, Trace::None, seed);
        assert!(!detect(&image, &geometry).unwrap().verdict.is_signal);
    }
}

#[test]
fn test_directory_run() {
    let geometry = DetectionGeometry::default();
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("2024-05");
    std::fs::create_dir_all(&nested).unwrap();

    save_png(
        &create_waterfall(&geometry, Trace::Transit { amplitude: 120.0 }, 10),
        &dir.path().join("waterfall_1.png"),
    );
    save_png(
        &create_waterfall(&geometry, Trace::Sweep { amplitude: 150.0 }, 11),
        &dir.path().join("waterfall_2.png"),
    );
    save_png(
        &create_waterfall(&geometry, Trace::None, 12),
        &nested.join("waterfall_3.png"),
    );
    save_png(
        &create_waterfall(&geometry, Trace::Transit { amplitude: 120.0 }, 13),
        &nested.join("waterfall_4.png"),
    );
    std::fs::write(dir.path().join("waterfall_5.png"), b"truncated").unwrap();
    std::fs::write(dir.path().join("waterfall_1_out.png"), b"plot").unwrap();

    let options = BatchOptions {
        recursive: true,
        ..BatchOptions::new(dir.path())
    };
    let candidates = discover_candidates(&options).unwrap();
    assert_eq!(candidates.len(), 5);

    let outcomes = classify_all(
        &candidates,
        &geometry,
        false,
        &indicatif::ProgressBar::hidden(),
    );
    let summary = BatchSummary::from_outcomes(&outcomes);
    assert_eq!(
        summary,
        BatchSummary {
            total: 4,
            signal: 2,
            no_signal: 2,
            failed: 1
        }
    );
    assert_eq!(summary.signal + summary.no_signal, summary.total);

    let report_path = dir.path().join("report.json");
    BatchReport::new(dir.path().to_path_buf(), geometry, outcomes)
        .write_json(&report_path)
        .unwrap();
    assert!(report_path.exists());
}

#[test]
fn test_filters_limit_directory_run() {
    let geometry = DetectionGeometry::default();
    let dir = tempfile::tempdir().unwrap();

    for (name, seed) in [("sat_a_1.png", 20), ("sat_a_2.png", 21), ("sat_b_1.png", 22)] {
        save_png(
            &create_waterfall(&geometry, Trace::Transit { amplitude: 120.0 }, seed),
            &dir.path().join(name),
        );
    }

    let options = BatchOptions {
        process_only: Some("sat_a".to_string()),
        process_not: Some("_2".to_string()),
        ..BatchOptions::new(dir.path())
    };
    let candidates = discover_candidates(&options).unwrap();
    assert_eq!(candidates, vec![dir.path().join("sat_a_1.png")]);
}

#[test]
fn test_empty_directory_reports_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let candidates = discover_candidates(&BatchOptions::new(dir.path())).unwrap();
    let outcomes = classify_all(
        &candidates,
        &DetectionGeometry::default(),
        false,
        &indicatif::ProgressBar::hidden(),
    );

    let summary = BatchSummary::from_outcomes(&outcomes);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.signal_percent(), None);
    assert_eq!(summary.to_string(), "No files processed");
}
