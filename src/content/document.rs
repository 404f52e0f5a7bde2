use std::io::{self, Write};
use std::path::Path;

use regex::bytes::Regex;
use tempfile::TempPath;

use super::lines::{scan, Hit};
use crate::archive::{self, ArchiveKind, EntryBytes};
use crate::error::SiftError;

/// Documents that need unpacking or conversion before their text can be
/// searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentKind {
    /// Office Open XML: a ZIP of XML parts.
    Office,
    /// Converted by the external utility.
    Pdf,
}

impl DocumentKind {
    /// `ext` is upper-case, as returned by [`Entry::extension`](crate::Entry::extension).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "DOCX" | "XLSX" | "PPTX" | "VSDX" => Some(Self::Office),
            "PDF" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Search every part of an Office Open XML file.
///
/// Any failure to unpack (not a ZIP, a part that will not inflate) is an
/// error, so the caller can fall back to scanning the raw bytes. A clean
/// unpack with no matching part is a plain miss.
pub(crate) fn search_office(
    regex: &Regex,
    path: &Path,
    find_all: bool,
    max_part_bytes: u64,
) -> Result<Hit, SiftError> {
    let mut hit = Hit::miss();
    let mut failure: Option<(String, io::Error)> = None;

    archive::scan(ArchiveKind::Zip, path, None, |part, bytes| {
        if part.is_dir {
            return true;
        }
        match bytes.read_up_to(max_part_bytes) {
            Ok(data) => {
                hit.merge(scan(regex, &data, find_all));
                find_all || !hit.found
            }
            Err(e) => {
                failure = Some((part.name, e));
                false
            }
        }
    })?;

    match failure {
        Some((name, e)) => Err(archive::extraction_failed(path, &name, e)),
        None => Ok(hit),
    }
}

/// Write `data` to a fresh temporary file for tools that need a real path.
///
/// The file is removed when the returned [`TempPath`] is dropped, on every
/// exit path of the caller.
pub(crate) fn materialize(data: &[u8], ext: &str, dir: Option<&Path>) -> Result<TempPath, SiftError> {
    let suffix = format!(".{}", ext.to_ascii_lowercase());
    let mut builder = tempfile::Builder::new();
    builder.prefix("dirsift-").suffix(&suffix);

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(SiftError::TempFileFailed)?;

    file.write_all(data).map_err(SiftError::TempFileFailed)?;
    file.flush().map_err(SiftError::TempFileFailed)?;
    Ok(file.into_temp_path())
}
