//! Per-file outcomes and aggregate counts of a vetting run.

use crate::detection::Verdict;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Result of vetting one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Classified { path: PathBuf, verdict: Verdict },
    Failed { path: PathBuf, error: String },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Classified { path, .. } | FileOutcome::Failed { path, .. } => path,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            FileOutcome::Classified { verdict, .. } => Some(verdict),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// One tab-separated line per file
impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Classified { path, verdict } => {
                write!(f, "{}\t{}", path.display(), verdict)
            }
            FileOutcome::Failed { path, error } => {
                write!(f, "{}\tERROR\t{}", path.display(), error)
            }
        }
    }
}

/// Counts over a vetting run.
///
/// `total` only counts classified files, so `signal + no_signal == total`;
/// files that failed to load or vet are counted separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub signal: usize,
    pub no_signal: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.record(outcome);
            summary
        })
    }

    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome.verdict() {
            Some(verdict) => {
                self.total += 1;
                if verdict.is_signal {
                    self.signal += 1;
                } else {
                    self.no_signal += 1;
                }
            }
            None => self.failed += 1,
        }
    }

    fn percent(&self, count: usize) -> Option<f64> {
        (self.total > 0).then(|| 100.0 * count as f64 / self.total as f64)
    }

    /// Share of classified files with a signal, `None` when nothing was classified
    pub fn signal_percent(&self) -> Option<f64> {
        self.percent(self.signal)
    }

    /// Share of classified files without a signal, `None` when nothing was classified
    pub fn no_signal_percent(&self) -> Option<f64> {
        self.percent(self.no_signal)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.signal_percent(), self.no_signal_percent()) {
            (Some(signal_percent), Some(no_signal_percent)) => {
                writeln!(f, "Total:\t{}", self.total)?;
                writeln!(f, "With Signal:\t{}\t{:.2}%", self.signal, signal_percent)?;
                write!(f, "W/o Signal:\t{}\t{:.2}%", self.no_signal, no_signal_percent)?;
            }
            _ => write!(f, "No files processed")?,
        }
        if self.failed > 0 {
            write!(f, "\nFailed:\t{}", self.failed)?;
        }
        Ok(())
    }
}
