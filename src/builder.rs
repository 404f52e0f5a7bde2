use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::content::{PdfConverter, SearchLimits};
use crate::error::SiftError;
use crate::query::{ContentMode, NameMask, PdfTool, Query, SortField, TextQuery};
use crate::range::{DateField, DateRange, SizeRange};
use crate::results::Results;
use crate::traits::Reporter;

// ---------------------------------------------------------------------------
// QueryBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a query.
///
/// Created via [`dirsift::query()`](crate::query). Configure with chained
/// builder methods, then call [`build()`](QueryBuilder::build) for a reusable
/// [`Query`] or [`run()`](QueryBuilder::run) to build and execute at once.
///
/// Patterns and ranges are only validated by `build()`, so a malformed one
/// fails before any directory is read.
///
/// # Example
///
/// ```rust,no_run
/// use dirsift::{CollectingReporter, ContentMode};
///
/// let mut reporter = CollectingReporter::new();
/// let results = dirsift::query()
///     .mask("*.txt")
///     .content(ContentMode::CaseInsensitive, "quarterly")
///     .recurse(true)
///     .archives(true)
///     .run("reports", &mut reporter)?;
///
/// println!("{} matches", results.matches);
/// # Ok::<(), dirsift::SiftError>(())
/// ```
#[derive(Debug, Default)]
pub struct QueryBuilder {
    mask:     Option<String>,
    content:  Option<(ContentMode, String)>,
    find_all: bool,
    sizes:    Option<String>,
    dates:    Option<String>,
    query:    Query,
}

impl QueryBuilder {
    // ── Names ────────────────────────────────────────────────────────────

    /// Glob the entry's own name must match (`*`, `?`, `[...]`).
    pub fn mask(mut self, pattern: impl Into<String>) -> Self {
        self.mask = Some(pattern.into());
        self
    }

    /// Case-sensitive name matching and sorting. Off by default.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.query.case_sensitive = yes;
        self
    }

    /// Only these extensions (without the dot, any case).
    pub fn include_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.query.include_exts = normalize_exts(exts);
        self
    }

    /// Never these extensions (without the dot, any case).
    pub fn exclude_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.query.exclude_exts = normalize_exts(exts);
        self
    }

    /// Directory names never entered while recursing.
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.exclude_dirs = names.into_iter().map(Into::into).collect();
        self
    }

    // ── Sizes and dates ──────────────────────────────────────────────────

    /// Size bounds as `"min:max"`; either side may be empty.
    /// Parsed by [`build()`](QueryBuilder::build).
    pub fn size_range(mut self, range: impl Into<String>) -> Self {
        self.sizes = Some(range.into());
        self
    }

    pub fn min_size(mut self, bytes: u64) -> Self {
        self.query.sizes.min = Some(bytes);
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.query.sizes.max = Some(bytes);
        self
    }

    /// Date bounds as `"YYYY-MM-DD:YYYY-MM-DD"` on `field`; either side may
    /// be empty and the upper date is inclusive.
    /// Parsed by [`build()`](QueryBuilder::build).
    pub fn date_range(mut self, field: DateField, range: impl Into<String>) -> Self {
        self.query.date_field = field;
        self.dates = Some(range.into());
        self
    }

    pub fn min_date(mut self, field: DateField, at: SystemTime) -> Self {
        self.query.date_field = field;
        self.query.dates.min = Some(at);
        self
    }

    pub fn max_date(mut self, field: DateField, at: SystemTime) -> Self {
        self.query.date_field = field;
        self.query.dates.max = Some(at);
        self
    }

    // ── Entry types ──────────────────────────────────────────────────────

    /// List files. On by default.
    pub fn files(mut self, yes: bool) -> Self {
        self.query.list_files = yes;
        self
    }

    /// List directories. On by default. Recursion does not depend on it.
    pub fn directories(mut self, yes: bool) -> Self {
        self.query.list_directories = yes;
        self
    }

    /// List and enter dot-prefixed entries. On by default.
    pub fn hidden(mut self, yes: bool) -> Self {
        self.query.list_hidden = yes;
        self
    }

    /// Only executables: an execute bit on Unix, a `.exe`/`.bat`/`.cmd`/`.com`
    /// extension on Windows.
    pub fn executables_only(mut self, yes: bool) -> Self {
        self.query.executables_only = yes;
        self
    }

    // ── Content ──────────────────────────────────────────────────────────

    /// Search file contents for `pattern`. Directories never match a
    /// content query.
    pub fn content(mut self, mode: ContentMode, pattern: impl Into<String>) -> Self {
        self.content = Some((mode, pattern.into()));
        self
    }

    /// Scan whole files and keep an excerpt of every match instead of
    /// stopping at the first.
    pub fn find_all(mut self, yes: bool) -> Self {
        self.find_all = yes;
        self
    }

    pub fn pdf_tool(mut self, tool: PdfTool) -> Self {
        self.query.pdf = PdfConverter::new(tool);
        self
    }

    /// Where archive-held documents are written for unpacking. The system
    /// temporary directory by default.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.query.temp_dir = Some(dir.into());
        self
    }

    pub fn limits(mut self, limits: SearchLimits) -> Self {
        self.query.limits = limits;
        self
    }

    // ── Traversal ────────────────────────────────────────────────────────

    pub fn recurse(mut self, yes: bool) -> Self {
        self.query.recurse = yes;
        self
    }

    /// Descend into ZIP, tar.gz and 7z files found while listing.
    pub fn archives(mut self, yes: bool) -> Self {
        self.query.archives = yes;
        self
    }

    /// Password for encrypted 7z archives.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.query.password = Some(password.into());
        self
    }

    // ── Ordering and output ──────────────────────────────────────────────

    pub fn sort(mut self, field: SortField, ascending: bool) -> Self {
        self.query.sort.field = field;
        self.query.sort.ascending = ascending;
        self
    }

    /// Keep directories ahead of files whatever the sort. On by default.
    pub fn directories_first(mut self, yes: bool) -> Self {
        self.query.sort.directories_first = yes;
        self
    }

    /// Collect full paths of matches into [`Results::paths`].
    pub fn collect_paths(mut self, yes: bool) -> Self {
        self.query.collect_paths = yes;
        self
    }

    /// Collect isolated failures into [`Results::errors`]. They are always
    /// logged.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.query.collect_errors = yes;
        self
    }

    // ── Execute ──────────────────────────────────────────────────────────

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// [`SiftError::InvalidPattern`] for a malformed glob or regular
    /// expression, [`SiftError::InvalidRange`] for a malformed size or date
    /// range.
    pub fn build(self) -> Result<Query, SiftError> {
        let mut query = self.query;

        if let Some(mask) = self.mask.as_deref().filter(|m| !m.is_empty()) {
            query.mask = Some(NameMask::new(mask, query.case_sensitive)?);
        }
        if let Some((mode, pattern)) = &self.content {
            query.text = Some(TextQuery::new(*mode, pattern, self.find_all)?);
        }
        if let Some(sizes) = &self.sizes {
            query.sizes = sizes.parse::<SizeRange>()?;
        }
        if let Some(dates) = &self.dates {
            query.dates = dates.parse::<DateRange>()?;
        }
        Ok(query)
    }

    /// Build, then run over `root`. See [`Query::run`].
    pub fn run(self, root: impl AsRef<Path>, reporter: &mut dyn Reporter) -> Result<Results, SiftError> {
        self.build()?.run(root, reporter)
    }
}

impl Query {
    /// Traverse `root`, a directory or an archive file, reporting each scope.
    ///
    /// # Errors
    ///
    /// Only for the root itself: [`SiftError::NotFound`] if it does not
    /// exist, [`SiftError::InvalidSource`] if it is neither a directory nor
    /// a supported archive. Everything below the root is isolated, logged
    /// and, with `.collect_errors(true)`, returned in [`Results::errors`].
    pub fn run(&self, root: impl AsRef<Path>, reporter: &mut dyn Reporter) -> Result<Results, SiftError> {
        crate::engine::run(self, root.as_ref(), reporter)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Upper-case, without a leading dot.
fn normalize_exts<I, S>(exts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    exts.into_iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_uppercase())
        .filter(|e| !e.is_empty())
        .collect()
}
