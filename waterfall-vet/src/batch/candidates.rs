//! Discovery of waterfall files to vet.

use super::BatchError;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Marker carried by diagnostic plot filenames
const OUTPUT_MARKER: &str = "out";
/// Only PNG renderings are vetted
const IMAGE_MARKER: &str = ".png";
/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &["__pycache__"];

/// Where to look for waterfalls and which files to keep
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Directory holding the waterfalls
    pub root: PathBuf,
    /// Descend into sub directories
    pub recursive: bool,
    /// Only keep files whose name contains this substring
    pub process_only: Option<String>,
    /// Drop files whose name contains this substring
    pub process_not: Option<String>,
}

impl BatchOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Whether a file called `name` should be vetted.
    ///
    /// Rejects diagnostic outputs, non-PNG files and names failing the
    /// include/exclude substrings.
    pub fn accepts(&self, name: &str) -> bool {
        if name.contains(OUTPUT_MARKER) || !name.contains(IMAGE_MARKER) {
            return false;
        }
        if let Some(only) = &self.process_only {
            if !name.contains(only.as_str()) {
                return false;
            }
        }
        if let Some(not) = &self.process_not {
            if name.contains(not.as_str()) {
                return false;
            }
        }
        true
    }
}

fn skip_dir(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

/// Collect accepted files below `dir`.
///
/// Only failing to list `dir` itself is an error. Unreadable entries and sub
/// directories are logged and skipped so one bad folder cannot end a run.
fn walk(dir: &Path, options: &BatchOptions, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if file_type.is_dir() {
            if options.recursive && !skip_dir(&name) {
                if let Err(e) = walk(&path, options, found) {
                    warn!("Skipping directory {}: {}", path.display(), e);
                }
            }
        } else if options.accepts(&name) {
            found.push(path);
        } else {
            debug!("Skipping {}", path.display());
        }
    }
    Ok(())
}

/// List waterfalls under `options.root`, sorted by path.
pub fn discover_candidates(options: &BatchOptions) -> Result<Vec<PathBuf>, BatchError> {
    if !options.root.is_dir() {
        return Err(BatchError::RootNotFound(options.root.clone()));
    }

    let mut found = Vec::new();
    walk(&options.root, options, &mut found).map_err(|source| BatchError::Io {
        path: options.root.clone(),
        source,
    })?;
    found.sort();
    Ok(found)
}
