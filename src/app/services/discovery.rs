//! Tabular file discovery for the input directories
//!
//! Enumeration is non-recursive and sorted by file name, so repeated runs
//! over the same directories always process files in the same order.

use crate::constants::is_tabular_file;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// List the tabular files directly inside a directory, sorted by name.
///
/// An unreadable or missing directory is recoverable: it logs a warning and
/// yields an empty list, leaving the pipeline to produce an empty result
/// instead of aborting.
pub fn discover_tabular_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read directory '{}': {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("Skipping unreadable entry in '{}': {}", dir.display(), e);
                None
            }
        })
        .filter(|path| path.is_file() && is_tabular_file(path))
        .collect();

    files.sort();

    debug!(
        "Discovered {} tabular file(s) in '{}'",
        files.len(),
        dir.display()
    );
    for file in &files {
        debug!("  found: {}", file.display());
    }

    files
}

/// The first tabular file in a directory, in sorted order
pub fn first_tabular_file(dir: &Path) -> Option<PathBuf> {
    discover_tabular_files(dir).into_iter().next()
}
