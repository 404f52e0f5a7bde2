use std::path::PathBuf;
use std::time::Duration;

use crate::error::SiftError;

/// The output of a completed traversal.
///
/// `paths` and `errors` are both opt-in. Enable them on the builder with
/// `.collect_paths(true)` and `.collect_errors(true)`.
#[derive(Debug)]
pub struct Results {
    /// Total number of entries that matched, across every scope.
    pub matches: usize,

    /// Full paths of matched entries, in report order. Archive entries are
    /// given as `archive/inner/name`.
    /// Only populated if `.collect_paths(true)` was set on the builder.
    pub paths: Vec<PathBuf>,

    /// Running totals for the whole run.
    pub stats: ScanStats,

    /// Isolated failures met during the traversal (unreadable directories,
    /// archives that would not open, wrong passwords).
    /// Only populated if `.collect_errors(true)` was set on the builder.
    pub errors: Vec<SiftError>,
}

/// Totals accumulated across every scope of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Matched files.
    pub files: usize,

    /// Matched directories.
    pub dirs: usize,

    /// Total size of matched files.
    pub bytes: u64,

    /// Archives successfully opened and listed.
    pub archives: usize,

    /// Wall-clock time from the start of the run to completion.
    pub duration: Duration,
}

impl ScanStats {
    /// Matched files plus matched directories.
    pub fn entries(&self) -> usize {
        self.files + self.dirs
    }
}
