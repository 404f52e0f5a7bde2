//! gzip+TAR adapter. The stream has no index: every operation is one
//! sequential pass, and reaching entry N means walking past entries 1..N-1.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use super::{extraction_failed, not_found, pseudo_seek_read, EntryBytes};
use crate::entry::{Entry, MODE_SYMLINK};
use crate::error::SiftError;
use crate::range::to_system_time;

fn open(path: &Path) -> Result<Archive<GzDecoder<BufReader<File>>>, SiftError> {
    let file = File::open(path).map_err(|e| open_failed(path, e))?;
    Ok(Archive::new(GzDecoder::new(BufReader::new(file))))
}

fn open_failed(path: &Path, reason: impl ToString) -> SiftError {
    SiftError::ArchiveOpenFailed {
        path:   path.to_path_buf(),
        reason: reason.to_string(),
    }
}

pub(crate) fn scan<F>(path: &Path, mut visit: F) -> Result<(), SiftError>
where
    F: FnMut(Entry, &mut dyn EntryBytes) -> bool,
{
    let mut archive = open(path)?;
    // A bad gzip header or tar block surfaces here or on the first entry.
    let entries = archive.entries().map_err(|e| open_failed(path, e))?;

    for item in entries {
        let mut tar_entry = item.map_err(|e| open_failed(path, e))?;
        let header = tar_entry.header();
        let kind = header.entry_type();

        let name = tar_entry
            .path()
            .map(|p| p.to_string_lossy().into_owned())
            .map_err(|e| open_failed(path, e))?;

        let mut entry = Entry::new(path, name);
        entry.size = tar_entry.size();
        entry.is_dir = kind.is_dir();
        entry.mode = header.mode().unwrap_or(0);
        entry.in_archive = true;
        if let Some(t) = header.mtime().ok().and_then(|t| to_system_time(t as i64)) {
            entry.modified = t;
        }
        if kind.is_symlink() {
            entry.mode |= MODE_SYMLINK;
            entry.link_target = tar_entry.link_name().ok().flatten().map(|p| p.into_owned());
        }

        if !visit(entry, &mut tar_entry) {
            break;
        }
    }
    Ok(())
}

pub(crate) fn extract_bytes(path: &Path, name: &str, offset: u64, max_len: u64) -> Result<Vec<u8>, SiftError> {
    let mut archive = open(path)?;
    let entries = archive.entries().map_err(|e| open_failed(path, e))?;

    for item in entries {
        let mut tar_entry = item.map_err(|e| extraction_failed(path, name, e))?;
        let matches = tar_entry
            .path()
            .map(|p| p.to_string_lossy() == name)
            .unwrap_or(false);
        if matches {
            return pseudo_seek_read(&mut tar_entry, offset, max_len)
                .map_err(|e| extraction_failed(path, name, e));
        }
    }
    Err(not_found(path, name))
}
