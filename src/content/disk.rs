use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use regex::bytes::Regex;

use super::lines::{scan, scan_from, Hit};
use super::SearchLimits;
use crate::error::SiftError;

/// Search a file on disk without loading it whole.
///
/// Reads `chunk_size` bytes at a time and carries the last `overlap` bytes
/// of each chunk into the next, so a match straddling a chunk boundary is
/// still seen. Files no larger than one chunk are read in a single pass.
///
/// The size comes from the opened handle, so a symlink is measured by its
/// target.
pub(crate) fn search_file(
    regex: &Regex,
    path: &Path,
    limits: &SearchLimits,
    find_all: bool,
) -> Result<Hit, SiftError> {
    let io_err = |source| SiftError::Io { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    let mut reader = BufReader::new(file);
    let chunk = limits.chunk_size.max(1);

    if size <= chunk as u64 {
        let mut buf = Vec::with_capacity(size as usize);
        reader.read_to_end(&mut buf).map_err(io_err)?;
        return Ok(scan(regex, &buf, find_all));
    }

    let overlap = limits.overlap.min(chunk);
    let mut buf: Vec<u8> = Vec::with_capacity(chunk + overlap);
    let mut reported_until = 0;
    let mut hit = Hit::miss();

    loop {
        let n = (&mut reader)
            .take(chunk as u64)
            .read_to_end(&mut buf)
            .map_err(io_err)?;
        if n == 0 {
            break;
        }

        let chunk_hit = scan_from(regex, &buf, find_all, reported_until);
        let last_end = chunk_hit.last_end.unwrap_or(reported_until);
        hit.merge(chunk_hit);
        if hit.found && !find_all {
            break;
        }
        if n < chunk {
            break;
        }

        let dropped = buf.len() - overlap.min(buf.len());
        reported_until = last_end.saturating_sub(dropped);
        buf.drain(..dropped);
    }
    Ok(hit)
}
