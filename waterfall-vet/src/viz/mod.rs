//! Diagnostic visualization of detection profiles

pub mod profile_plot;

pub use profile_plot::{derive_plot_path, PlotError, ProfilePlotter};
