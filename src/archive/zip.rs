//! ZIP adapter. Opens the central directory once and decompresses an entry
//! only when its bytes are asked for.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use chrono::NaiveDate;
use log::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{extraction_failed, not_found, pseudo_seek_read, EntryBytes};
use crate::entry::Entry;
use crate::error::SiftError;
use crate::range::utc_time;

fn open(path: &Path) -> Result<ZipArchive<BufReader<File>>, SiftError> {
    let file = File::open(path).map_err(|e| open_failed(path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| open_failed(path, e))
}

fn open_failed(path: &Path, reason: impl ToString) -> SiftError {
    SiftError::ArchiveOpenFailed {
        path:   path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Payload of entry `index`, opened on first read.
struct ZipEntryBytes<'a, R: Read + Seek> {
    archive: &'a mut ZipArchive<R>,
    index:   usize,
}

impl<R: Read + Seek> EntryBytes for ZipEntryBytes<'_, R> {
    fn read_up_to(&mut self, max: u64) -> io::Result<Vec<u8>> {
        let mut file = self.archive.by_index(self.index).map_err(io::Error::other)?;
        file.read_up_to(max)
    }
}

pub(crate) fn scan<F>(path: &Path, mut visit: F) -> Result<(), SiftError>
where
    F: FnMut(Entry, &mut dyn EntryBytes) -> bool,
{
    let mut archive = open(path)?;
    debug!("zip {}: {} entries", path.display(), archive.len());

    for index in 0..archive.len() {
        // Raw access reads the header without setting up decompression.
        let entry = match archive.by_index_raw(index) {
            Ok(file) => {
                // DOS timestamps carry no zone and may hold impossible dates.
                let modified = file.last_modified().and_then(|dt| {
                    NaiveDate::from_ymd_opt(dt.year() as i32, dt.month() as u32, dt.day() as u32)
                        .and_then(|d| d.and_hms_opt(dt.hour() as u32, dt.minute() as u32, dt.second() as u32))
                        .map(utc_time)
                });
                let mut entry = Entry::new(path, file.name());
                entry.size = file.size();
                entry.is_dir = file.is_dir();
                entry.mode = file.unix_mode().unwrap_or(0);
                entry.in_archive = true;
                if let Some(t) = modified {
                    entry.modified = t;
                }
                entry
            }
            Err(ZipError::Io(e)) => return Err(SiftError::Io { path: path.to_path_buf(), source: e }),
            Err(e) => return Err(open_failed(path, e)),
        };

        let mut bytes = ZipEntryBytes { archive: &mut archive, index };
        if !visit(entry, &mut bytes) {
            break;
        }
    }
    Ok(())
}

pub(crate) fn extract_bytes(path: &Path, name: &str, offset: u64, max_len: u64) -> Result<Vec<u8>, SiftError> {
    let mut archive = open(path)?;
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(not_found(path, name)),
        Err(e) => return Err(extraction_failed(path, name, e)),
    };
    pseudo_seek_read(&mut file, offset, max_len).map_err(|e| extraction_failed(path, name, e))
}
