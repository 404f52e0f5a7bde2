use std::path::{Path, PathBuf};

use crate::archive::ArchiveKind;
use crate::entry::Entry;
use crate::listing::ListingSet;
use crate::results::ScanStats;

/// The scope a [`ListingSet`] came from.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Directory, or archive file.
    pub path: &'a Path,

    /// [`ArchiveKind::NotAnArchive`] for directory scopes.
    pub archive: ArchiveKind,

    /// Distance from the root scope. Archive scopes count as one level below
    /// the directory that holds them.
    pub depth: usize,
}

impl Scope<'_> {
    pub fn is_archive(&self) -> bool {
        self.archive.is_archive()
    }
}

/// Receives each scope's sorted matches as the traversal produces them.
///
/// This is the seam to output formatting: the library decides what matched
/// and in which order, an implementor decides how it looks. Scopes arrive
/// depth-first, parents before children.
///
/// # Example
///
/// ```rust
/// use dirsift::{ListingSet, Reporter, ScanStats, Scope};
///
/// struct Printer;
///
/// impl Reporter for Printer {
///     fn scope(&mut self, scope: &Scope<'_>, listing: &ListingSet, _totals: &ScanStats) {
///         println!("{}:", scope.path.display());
///         for entry in &listing.matched {
///             println!("  {} {}", entry.kind(), entry.name);
///         }
///     }
/// }
/// ```
pub trait Reporter {
    /// One finished scope. `totals` already includes this scope.
    ///
    /// Called for every scope that was listed, including those where
    /// nothing matched.
    fn scope(&mut self, scope: &Scope<'_>, listing: &ListingSet, totals: &ScanStats);

    /// Called once after the last scope.
    fn finish(&mut self, _stats: &ScanStats) {}
}

/// Discards everything. For callers that only need [`Results`](crate::Results).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn scope(&mut self, _scope: &Scope<'_>, _listing: &ListingSet, _totals: &ScanStats) {}
}

/// Keeps every matched entry, tagged with the scope it came from.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    /// `(scope path, entry)` in report order.
    pub entries: Vec<(PathBuf, Entry)>,
    /// Every scope path reported, including empty ones.
    pub scopes: Vec<PathBuf>,
    pub stats: Option<ScanStats>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of collected entries, in report order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, e)| e.name.as_str()).collect()
    }
}

impl Reporter for CollectingReporter {
    fn scope(&mut self, scope: &Scope<'_>, listing: &ListingSet, _totals: &ScanStats) {
        self.scopes.push(scope.path.to_path_buf());
        self.entries
            .extend(listing.matched.iter().map(|e| (scope.path.to_path_buf(), e.clone())));
    }

    fn finish(&mut self, stats: &ScanStats) {
        self.stats = Some(*stats);
    }
}
