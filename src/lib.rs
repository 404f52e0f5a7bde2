//! # dirsift
//!
//! File selection and content search over directories, archives and
//! documents.
//!
//! dirsift decides, for every entry of a directory tree, whether it matches
//! a compound query: a name glob, size and date bounds, extension lists, and
//! optionally a text pattern searched inside the file. The same rules apply
//! to entries inside ZIP, tar.gz and 7z archives (including encrypted 7z),
//! and content search reaches into Office Open XML documents and, through
//! the external `pdftotext` utility, PDF files.
//!
//! It does **not** parse command lines or format output. Each scope's sorted
//! matches are handed to a [`Reporter`] you provide.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dirsift::{CollectingReporter, ContentMode, SortField};
//!
//! let mut reporter = CollectingReporter::new();
//! let results = dirsift::query()
//!     .content(ContentMode::CaseInsensitive, "quarterly results")
//!     .recurse(true)
//!     .archives(true)
//!     .sort(SortField::Size, false)
//!     .collect_paths(true)
//!     .run(".", &mut reporter)?;
//!
//! for path in &results.paths {
//!     println!("{}", path.display());
//! }
//! println!("{} matches in {:.3}s",
//!     results.matches,
//!     results.stats.duration.as_secs_f64()
//! );
//! # Ok::<(), dirsift::SiftError>(())
//! ```
//!
//! # Reusing a query
//!
//! [`QueryBuilder::build`] validates everything up front and returns an
//! immutable [`Query`], which can be run any number of times or applied to
//! single entries:
//!
//! ```rust
//! use dirsift::Entry;
//!
//! let query = dirsift::query().mask("*.RS").build()?;
//!
//! let entry = Entry::new("src", "lib.rs");
//! assert!(query.matches(&entry).matched);
//! # Ok::<(), dirsift::SiftError>(())
//! ```
//!
//! # Logging
//!
//! Isolated failures (an archive that will not open, a wrong password, a
//! missing `pdftotext`) are reported through the [`log`] facade at `warn`
//! level; progress is logged at `debug`. No logger is installed.

#![forbid(unsafe_code)]

pub mod archive;

mod builder;
mod condition;
mod content;
mod engine;
mod entry;
mod error;
mod kind;
mod listing;
mod query;
mod range;
mod results;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use archive::ArchiveKind;
pub use builder::QueryBuilder;
pub use condition::Verdict;
pub use content::{SearchLimits, EXCERPT_AFTER, EXCERPT_BEFORE, PDF_UTILITY};
pub use entry::{Entry, MODE_EXECUTABLE, MODE_SYMLINK, MODE_TYPE_MASK};
pub use error::SiftError;
pub use kind::FileKind;
pub use listing::ListingSet;
pub use query::{ContentMode, NameMask, PdfTool, Query, SortField, SortOrder, TextQuery};
pub use range::{DateField, DateRange, SizeRange};
pub use results::{Results, ScanStats};
pub use traits::{CollectingReporter, NullReporter, Reporter, Scope};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`QueryBuilder`].
///
/// # Example
///
/// ```rust
/// let query = dirsift::query()
///     .mask("*.log")
///     .size_range("1024:")
///     .exclude_dirs(["target", ".git"])
///     .build()
///     .unwrap();
///
/// assert!(query.text().is_none());
/// ```
pub fn query() -> QueryBuilder {
    QueryBuilder::default()
}
