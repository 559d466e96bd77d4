//! Batch vetting of ground-station waterfalls.
//!
//! Walks a directory of waterfall PNGs, vets each one and prints a
//! tab-separated line per file followed by aggregate counts.
//!
//! # Usage
//!
//! ```bash
//! # Vet every waterfall in a directory
//! cargo run --release --bin vet_waterfalls -- data/waterfalls
//!
//! # Recurse, keep only one satellite's files and store profile plots
//! cargo run --release --bin vet_waterfalls -- data -r -d --process-only 43803
//!
//! # Custom geometry and a JSON report
//! cargo run --release --bin vet_waterfalls -- data --config geometry.json --json-report report.json
//! ```
//!
//! Per-file lines read `path  [first_hot, third_hot]  noise_floor  verdict`.
//! Set `RUST_LOG=debug` to see per-file geometry and peak rows.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::PathBuf;
use waterfall_vet::batch::{classify_all, discover_candidates, BatchOptions, BatchReport};
use waterfall_vet::detection::DetectionGeometry;

#[derive(Parser, Debug)]
#[command(
    name = "vet_waterfalls",
    author,
    version,
    about = "Classify ground-station waterfalls by whether they likely contain the tracked satellite's signal",
    long_about = "Vets each waterfall by comparing the green channel along the center line \
        with two control lines at 1/4 and 3/4 of the width. A waterfall counts as having \
        a signal only when both the first and the last third of the observation show a \
        spike above the noise floor; the middle third is ignored so that other \
        satellites sweeping through the band are not counted. Waterfalls without a \
        detection may still hold an observation and should be vetted by hand."
)]
struct Args {
    /// Directory with waterfall PNGs
    path: PathBuf,

    /// Store a plot of the profile behind each decision next to the waterfall
    #[arg(short, long)]
    debug: bool,

    /// Recurse into sub directories
    #[arg(short, long = "recurse")]
    recurse: bool,

    /// Only process files whose name contains this substring
    #[arg(long)]
    process_only: Option<String>,

    /// Skip files whose name contains this substring
    #[arg(long)]
    process_not: Option<String>,

    /// JSON file with detection geometry
    #[arg(long)]
    config: Option<PathBuf>,

    /// Required spike height above the noise floor
    #[arg(long)]
    threshold: Option<f64>,

    /// Rows to skip at the top of each waterfall
    #[arg(long)]
    margin_top: Option<usize>,

    /// Rows to skip at the bottom of each waterfall
    #[arg(long)]
    margin_bottom: Option<usize>,

    /// Columns on either side of each band's center column
    #[arg(long)]
    band_half_width: Option<usize>,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Write per-file results and the summary as JSON
    #[arg(long)]
    json_report: Option<PathBuf>,
}

impl Args {
    fn geometry(&self) -> Result<DetectionGeometry> {
        let mut geometry = match &self.config {
            Some(path) => DetectionGeometry::load_from_file(path)?,
            None => DetectionGeometry::default(),
        };
        if let Some(threshold) = self.threshold {
            geometry.threshold = threshold;
        }
        if let Some(margin_top) = self.margin_top {
            geometry.margin_top = margin_top;
        }
        if let Some(margin_bottom) = self.margin_bottom {
            geometry.margin_bottom = margin_bottom;
        }
        if let Some(band_half_width) = self.band_half_width {
            geometry.band_half_width = band_half_width;
        }
        Ok(geometry)
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            root: self.path.clone(),
            recursive: self.recurse,
            process_only: self.process_only.clone(),
            process_not: self.process_not.clone(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker pool")?;
    }

    let geometry = args.geometry()?;
    let candidates = discover_candidates(&args.batch_options())?;
    info!(
        "Found {} waterfalls under {}",
        candidates.len(),
        args.path.display()
    );

    let progress = ProgressBar::new(candidates.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    let outcomes = classify_all(&candidates, &geometry, args.debug, &progress);
    progress.finish_and_clear();

    for outcome in &outcomes {
        println!("{outcome}");
    }

    let report = BatchReport::new(args.path.clone(), geometry, outcomes);
    println!("\n{}", report.summary);

    if let Some(path) = &args.json_report {
        report.write_json(path)?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
