//! Content search: does an entry's text match the query?
//!
//! Three byte sources feed the same line matcher:
//!
//! - files on disk, read in overlapping chunks;
//! - archive entries, loaded whole up to a size bound;
//! - nested documents. Office Open XML files are unpacked and each part is
//!   searched; PDF files go through an external converter. Archive-held
//!   documents are first written to a temporary file, which is removed
//!   before the search returns.

use log::{debug, warn};

use crate::archive::{self, EntryBytes};
use crate::entry::Entry;
use crate::query::{Query, TextQuery};

mod disk;
mod document;
mod lines;
mod pdf;

pub use lines::{EXCERPT_AFTER, EXCERPT_BEFORE};
pub use pdf::PDF_UTILITY;

pub(crate) use lines::Hit;
pub(crate) use pdf::PdfConverter;

use document::DocumentKind;

/// Default disk read size.
pub const DEFAULT_CHUNK_SIZE: usize = 20_000;
/// Default trailer carried from one disk chunk into the next.
pub const DEFAULT_OVERLAP: usize = 400;
/// Default bound on archive entries loaded into memory.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 1_000_000;
/// Default bound on a single part of an Office document.
pub const DEFAULT_MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Memory and I/O bounds for content search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Bytes read per disk chunk.
    pub chunk_size: usize,
    /// Bytes carried into the next chunk so boundary-spanning matches are seen.
    pub overlap: usize,
    /// Archive entries larger than this are never loaded and never match.
    pub max_entry_bytes: u64,
    /// Office document parts are read up to this many bytes each.
    pub max_part_bytes: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            chunk_size:      DEFAULT_CHUNK_SIZE,
            overlap:         DEFAULT_OVERLAP,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            max_part_bytes:  DEFAULT_MAX_PART_BYTES,
        }
    }
}

/// Content search over one query: its pattern, its limits and its lazily
/// resolved PDF converter.
pub(crate) struct ContentSearcher<'q> {
    query: &'q Query,
    pdf:   &'q PdfConverter,
}

impl<'q> ContentSearcher<'q> {
    pub fn new(query: &'q Query) -> Self {
        Self { query, pdf: &query.pdf }
    }

    fn text(&self) -> Option<&'q TextQuery> {
        self.query.text.as_ref()
    }

    /// Search a file on disk.
    pub fn search_disk(&self, entry: &Entry) -> Hit {
        let Some(text) = self.text() else {
            return Hit::miss();
        };
        let path = entry.full_path();
        let limits = &self.query.limits;

        let raw = || match disk::search_file(&text.regex, &path, limits, text.find_all) {
            Ok(hit) => hit,
            Err(e) => {
                warn!("text search failed: {e}");
                Hit::miss()
            }
        };

        match DocumentKind::from_extension(&entry.extension()) {
            Some(DocumentKind::Office) => {
                debug!("office text search on {}", path.display());
                match document::search_office(&text.regex, &path, text.find_all, limits.max_part_bytes) {
                    Ok(hit) => hit,
                    Err(e) => {
                        debug!("{e}; scanning raw bytes instead");
                        raw()
                    }
                }
            }
            Some(DocumentKind::Pdf) => match self.pdf.to_text(&path) {
                Ok(converted) => lines::scan(&text.regex, converted.as_bytes(), text.find_all),
                Err(e) => {
                    debug!("{e}");
                    Hit::miss()
                }
            },
            None => raw(),
        }
    }

    /// Search an archive entry.
    ///
    /// Entries over [`SearchLimits::max_entry_bytes`] are skipped without
    /// being read. `loader` reads from an archive pass already in progress;
    /// without one the entry is extracted from `entry.path` by name.
    pub fn search_archive_entry(&self, entry: &Entry, loader: Option<&mut dyn EntryBytes>) -> Hit {
        if self.text().is_none() {
            return Hit::miss();
        }
        let max = self.query.limits.max_entry_bytes;
        if entry.size > max {
            debug!("skipping {} in {}: {} bytes", entry.name, entry.path.display(), entry.size);
            return Hit::miss();
        }

        let loaded = match loader {
            Some(loader) => loader
                .read_up_to(max)
                .map_err(|e| archive::extraction_failed(&entry.path, &entry.name, e)),
            None => archive::extract_bytes(&entry.path, &entry.name, 0, max, self.query.password()),
        };
        match loaded {
            Ok(data) => self.search_entry_bytes(entry, &data),
            Err(e) => {
                warn!("{e}");
                Hit::miss()
            }
        }
    }

    /// Search bytes already loaded from an archive entry.
    pub fn search_entry_bytes(&self, entry: &Entry, data: &[u8]) -> Hit {
        let Some(text) = self.text() else {
            return Hit::miss();
        };
        let ext = entry.extension();
        let Some(doc) = DocumentKind::from_extension(&ext) else {
            return lines::scan(&text.regex, data, text.find_all);
        };
        if doc == DocumentKind::Pdf && self.pdf.program().is_none() {
            return Hit::miss();
        }

        let temp = match document::materialize(data, &ext, self.query.temp_dir()) {
            Ok(temp) => temp,
            Err(e) => {
                warn!("{e} for {}", entry.name);
                return Hit::miss();
            }
        };

        match doc {
            DocumentKind::Pdf => match self.pdf.to_text(&temp) {
                Ok(converted) => lines::scan(&text.regex, converted.as_bytes(), text.find_all),
                Err(e) => {
                    debug!("{e}");
                    Hit::miss()
                }
            },
            DocumentKind::Office => {
                match document::search_office(&text.regex, &temp, text.find_all, self.query.limits.max_part_bytes) {
                    Ok(hit) => hit,
                    Err(e) => {
                        debug!("{e}; scanning raw bytes instead");
                        lines::scan(&text.regex, data, text.find_all)
                    }
                }
            }
        }
    }
}
