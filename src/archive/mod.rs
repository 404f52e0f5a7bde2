//! Archive adapters.
//!
//! Each supported format turns its native structure into [`Entry`] values
//! and gives byte access to a named entry. The format set is closed, so
//! dispatch is a plain `match` on [`ArchiveKind`].
//!
//! All three adapters expose the same fused pass: [`scan`] visits entries in
//! archive order and hands the visitor a lazy [`EntryBytes`] handle, so the
//! caller decides per entry whether its payload is ever decompressed.

use std::io::{self, Read};
use std::path::Path;

use crate::entry::Entry;
use crate::error::SiftError;

pub(crate) mod sevenz;
pub(crate) mod targz;
pub(crate) mod zip;

/// Archive formats the traversal can descend into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    Zip,
    /// TAR wrapped in gzip (`.tgz`, `.tar.gz`).
    GzipTar,
    SevenZip,
    /// Anything else. Treated as an ordinary file.
    NotAnArchive,
}

impl ArchiveKind {
    /// Detect the format from a file name's extension.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Self::Zip
        } else if lower.ends_with(".tgz") || lower.ends_with(".tar.gz") {
            Self::GzipTar
        } else if lower.ends_with(".7z") {
            Self::SevenZip
        } else {
            Self::NotAnArchive
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .map(|n| Self::from_name(&n.to_string_lossy()))
            .unwrap_or(Self::NotAnArchive)
    }

    pub fn is_archive(self) -> bool {
        self != Self::NotAnArchive
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Zip          => "zip",
            Self::GzipTar      => "tar.gz",
            Self::SevenZip     => "7z",
            Self::NotAnArchive => "none",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Lazy entry payload
// ---------------------------------------------------------------------------

/// The payload of the entry currently being visited by [`scan`].
///
/// Nothing is decompressed until [`read_up_to`](EntryBytes::read_up_to) is
/// called; entries that are never read are skipped as cheaply as the format
/// allows.
pub trait EntryBytes {
    /// Read at most `max` bytes from the start of the entry.
    fn read_up_to(&mut self, max: u64) -> io::Result<Vec<u8>>;
}

impl<R: Read + ?Sized> EntryBytes for R {
    fn read_up_to(&mut self, max: u64) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut *self).take(max).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// Discard `offset` bytes, then read at most `max_len`. Compressed streams
/// cannot seek, so reaching the offset means decompressing up to it.
pub(crate) fn pseudo_seek_read<R: Read + ?Sized>(
    reader: &mut R,
    offset: u64,
    max_len: u64,
) -> io::Result<Vec<u8>> {
    if offset > 0 {
        io::copy(&mut (&mut *reader).take(offset), &mut io::sink())?;
    }
    reader.read_up_to(max_len)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Visit every entry of the archive at `path` in storage order.
///
/// `visit` returns `false` to stop early. An archive that cannot be opened
/// yields no entries and an error; a stream that breaks part way keeps the
/// entries already visited and reports the error.
pub(crate) fn scan<F>(
    kind: ArchiveKind,
    path: &Path,
    password: Option<&str>,
    visit: F,
) -> Result<(), SiftError>
where
    F: FnMut(Entry, &mut dyn EntryBytes) -> bool,
{
    match kind {
        ArchiveKind::Zip          => zip::scan(path, visit),
        ArchiveKind::GzipTar      => targz::scan(path, visit),
        ArchiveKind::SevenZip     => sevenz::scan(path, password, visit),
        ArchiveKind::NotAnArchive => Err(SiftError::ArchiveOpenFailed {
            path:   path.to_path_buf(),
            reason: "unsupported archive type".into(),
        }),
    }
}

/// List every entry of an archive without reading any payload.
pub fn enumerate(path: &Path, password: Option<&str>) -> Result<Vec<Entry>, SiftError> {
    let mut entries = Vec::new();
    scan(ArchiveKind::from_path(path), path, password, |entry, _| {
        entries.push(entry);
        true
    })?;
    Ok(entries)
}

/// Uncompressed bytes of the entry named `name`, starting at `offset` and
/// at most `max_len` long.
pub fn extract_bytes(
    path: &Path,
    name: &str,
    offset: u64,
    max_len: u64,
    password: Option<&str>,
) -> Result<Vec<u8>, SiftError> {
    match ArchiveKind::from_path(path) {
        ArchiveKind::Zip          => zip::extract_bytes(path, name, offset, max_len),
        ArchiveKind::GzipTar      => targz::extract_bytes(path, name, offset, max_len),
        ArchiveKind::SevenZip     => sevenz::extract_bytes(path, name, offset, max_len, password),
        ArchiveKind::NotAnArchive => Err(SiftError::ArchiveOpenFailed {
            path:   path.to_path_buf(),
            reason: "unsupported archive type".into(),
        }),
    }
}

pub(crate) fn extraction_failed(archive: &Path, entry: &str, reason: impl ToString) -> SiftError {
    SiftError::ExtractionFailed {
        archive: archive.to_path_buf(),
        entry:   entry.to_string(),
        reason:  reason.to_string(),
    }
}

pub(crate) fn not_found(archive: &Path, entry: &str) -> SiftError {
    extraction_failed(archive, entry, "no such entry")
}
