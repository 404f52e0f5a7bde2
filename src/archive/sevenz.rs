//! 7-Zip adapter, with optional password.
//!
//! Entries are visited in block order through a single decoding pass. The
//! visitor only pulls bytes for the entries it wants, so entries rejected on
//! name, size or date are never copied out.

use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;

use log::debug;
use sevenz_rust::{Password, SevenZArchiveEntry, SevenZReader};

use super::{extraction_failed, not_found, pseudo_seek_read, EntryBytes};
use crate::entry::{Entry, MODE_TYPE_MASK};
use crate::error::SiftError;

/// Set in `windows_attributes` when the high 16 bits carry a Unix mode.
const UNIX_EXTENSION: u32 = 0x8000;

/// How much of the first stream is decoded to check a password.
const PASSWORD_CHECK_BYTES: u64 = 64 * 1024;

fn password(password: Option<&str>) -> Password {
    match password {
        Some(p) => Password::from(p),
        None => Password::empty(),
    }
}

/// Map a library error to the caller-facing kind. Wrong or missing
/// passwords must not be confused with a missing or corrupt archive.
fn classify(path: &Path, err: sevenz_rust::Error) -> SiftError {
    let auth = matches!(
        err,
        sevenz_rust::Error::PasswordRequired | sevenz_rust::Error::MaybeBadPassword(_)
    ) || err.to_string().to_lowercase().contains("password");

    if auth {
        SiftError::ArchiveAuthFailed(path.to_path_buf())
    } else {
        SiftError::ArchiveOpenFailed {
            path:   path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

fn open(path: &Path, pw: Option<&str>) -> Result<SevenZReader<std::fs::File>, SiftError> {
    let reader = SevenZReader::open(path, password(pw)).map_err(|e| classify(path, e))?;
    if pw.is_some() {
        verify_password(path, pw)?;
    }
    Ok(reader)
}

/// Headers may be stored in the clear even when the content is encrypted,
/// so a wrong password can open cleanly. Decode the head of the first stream
/// to find out; a bad key breaks the decompressor well before the bound.
fn verify_password(path: &Path, pw: Option<&str>) -> Result<(), SiftError> {
    let mut check = SevenZReader::open(path, password(pw)).map_err(|e| classify(path, e))?;
    let mut failure: Option<io::Error> = None;

    check
        .for_each_entries(|entry, reader| {
            if !entry.has_stream() || entry.size() == 0 {
                return Ok(true);
            }
            let mut head = reader.take(PASSWORD_CHECK_BYTES);
            if let Err(e) = io::copy(&mut head, &mut io::sink()) {
                failure = Some(e);
            }
            Ok(false)
        })
        .map_err(|e| classify(path, e))?;

    match failure {
        Some(e) => {
            debug!("7z {}: first stream failed to decode: {e}", path.display());
            Err(SiftError::ArchiveAuthFailed(path.to_path_buf()))
        }
        None => Ok(()),
    }
}

fn to_entry(archive: &Path, sz: &SevenZArchiveEntry) -> Entry {
    let mut entry = Entry::new(archive, sz.name());
    entry.size = sz.size();
    entry.is_dir = sz.is_directory();
    entry.in_archive = true;
    if sz.has_last_modified_date {
        entry.modified = SystemTime::from(sz.last_modified_date());
    }
    if sz.has_creation_date {
        entry.created = Some(SystemTime::from(sz.creation_date()));
    }
    if sz.has_access_date {
        entry.accessed = Some(SystemTime::from(sz.access_date()));
    }
    if sz.has_windows_attributes && sz.windows_attributes & UNIX_EXTENSION != 0 {
        entry.mode = (sz.windows_attributes >> 16) & (MODE_TYPE_MASK | 0o7777);
    }
    entry
}

pub(crate) fn scan<F>(path: &Path, pw: Option<&str>, mut visit: F) -> Result<(), SiftError>
where
    F: FnMut(Entry, &mut dyn EntryBytes) -> bool,
{
    let mut reader = open(path, pw)?;
    debug!("7z {}: {} entries", path.display(), reader.archive().files.len());

    reader
        .for_each_entries(|sz, mut data: &mut dyn Read| Ok(visit(to_entry(path, sz), &mut data)))
        .map_err(|e| classify(path, e))
}

pub(crate) fn extract_bytes(
    path: &Path,
    name: &str,
    offset: u64,
    max_len: u64,
    pw: Option<&str>,
) -> Result<Vec<u8>, SiftError> {
    let mut reader = open(path, pw)?;
    let mut found: Option<io::Result<Vec<u8>>> = None;

    reader
        .for_each_entries(|sz, data| {
            if sz.name() != name {
                return Ok(true);
            }
            found = Some(pseudo_seek_read(data, offset, max_len));
            Ok(false)
        })
        .map_err(|e| classify(path, e))?;

    match found {
        Some(Ok(bytes)) => Ok(bytes),
        Some(Err(e)) => Err(extraction_failed(path, name, e)),
        None => Err(not_found(path, name)),
    }
}
