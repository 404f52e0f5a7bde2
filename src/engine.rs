use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use ignore::{DirEntry, WalkBuilder};
use log::{debug, warn};

use crate::archive::{self, ArchiveKind};
use crate::condition::Evaluator;
use crate::content::ContentSearcher;
use crate::entry::Entry;
use crate::error::SiftError;
use crate::listing::ListingSet;
use crate::query::Query;
use crate::results::{Results, ScanStats};
use crate::traits::{Reporter, Scope};

// ---------------------------------------------------------------------------
// Running totals
// ---------------------------------------------------------------------------

/// Totals threaded through the recursion. Each scope takes the tally by
/// value and hands back the updated one.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub stats:   ScanStats,
    pub matches: usize,
    pub paths:   Vec<PathBuf>,
    pub errors:  Vec<SiftError>,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Traverse `root` depth-first and report every scope.
///
/// `root` may be a directory or an archive file. Failures below the root
/// are logged, optionally collected, and never stop the run.
pub(crate) fn run(
    query: &Query,
    root: &Path,
    reporter: &mut dyn Reporter,
) -> Result<Results, SiftError> {
    let meta = std::fs::metadata(root).map_err(|e| map_io_error(root, e))?;
    let start = Instant::now();

    let content = ContentSearcher::new(query);
    let eval = Evaluator::new(query, &content);
    let mut walker = Walker { query, eval: &eval, reporter };

    let tally = if meta.is_dir() {
        walker.directory(root, 0, Tally::default())
    } else {
        let kind = ArchiveKind::from_path(root);
        if !kind.is_archive() {
            return Err(SiftError::InvalidSource(root.to_path_buf()));
        }
        walker.archive(root, kind, 0, false, Tally::default())
    };

    let mut stats = tally.stats;
    stats.duration = start.elapsed();
    walker.reporter.finish(&stats);

    Ok(Results {
        matches: tally.matches,
        paths:   tally.paths,
        stats,
        errors:  tally.errors,
    })
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

struct Walker<'a, 'r> {
    query:    &'a Query,
    eval:     &'a Evaluator<'a>,
    reporter: &'r mut dyn Reporter,
}

impl Walker<'_, '_> {
    fn directory(&mut self, dir: &Path, depth: usize, mut tally: Tally) -> Tally {
        let q = self.query;
        if q.excludes_dir(dir) {
            debug!("skipping excluded {}", dir.display());
            return tally;
        }
        debug!("listing {}", dir.display());
        let mut listing = ListingSet::new();

        for res in read_children(dir) {
            let entry = match res {
                Ok(e) => e,
                Err(e) => {
                    self.fail(&mut tally, e);
                    continue;
                }
            };

            let visible = q.list_hidden || !entry.is_hidden();
            if entry.is_dir {
                if visible && !q.excludes_dir(Path::new(&entry.name)) {
                    listing.subdirs.push(entry.name.clone());
                }
            } else if q.archives && visible && ArchiveKind::from_name(&entry.name).is_archive() {
                listing.archives.push(entry.name.clone());
            }

            let verdict = self.eval.evaluate(&entry, false, None);
            if verdict.matched {
                let mut entry = entry;
                entry.excerpt = verdict.excerpt;
                listing.push(entry);
            }
        }

        listing.sort(&q.sort, q.case_sensitive);
        let scope = Scope { path: dir, archive: ArchiveKind::NotAnArchive, depth };
        tally = self.report(&scope, &listing, tally);

        for name in &listing.archives {
            let path = dir.join(name);
            let pass_through = q.mask_matches(name);
            tally = self.archive(&path, ArchiveKind::from_name(name), depth + 1, pass_through, tally);
        }
        if q.recurse {
            for name in &listing.subdirs {
                tally = self.directory(&dir.join(name), depth + 1, tally);
            }
        }
        tally
    }

    /// One pass over an archive: each entry is filtered as it is visited,
    /// and its payload is only decompressed when content search needs it.
    fn archive(
        &mut self,
        path: &Path,
        kind: ArchiveKind,
        depth: usize,
        pass_through: bool,
        mut tally: Tally,
    ) -> Tally {
        debug!("descending into {kind} archive {}", path.display());
        let eval = self.eval;
        let mut listing = ListingSet::new();

        let result = archive::scan(kind, path, self.query.password(), |entry, bytes| {
            let verdict = eval.evaluate(&entry, pass_through, Some(bytes));
            if verdict.matched {
                let mut entry = entry;
                entry.excerpt = verdict.excerpt;
                listing.push(entry);
            }
            true
        });

        let opened = match result {
            Ok(()) => true,
            Err(e) => {
                let partial = !listing.is_empty();
                self.fail(&mut tally, e);
                partial
            }
        };
        if !opened {
            return tally;
        }

        tally.stats.archives += 1;
        listing.sort(&self.query.sort, self.query.case_sensitive);
        let scope = Scope { path, archive: kind, depth };
        self.report(&scope, &listing, tally)
    }

    fn report(&mut self, scope: &Scope<'_>, listing: &ListingSet, mut tally: Tally) -> Tally {
        tally.stats.files += listing.file_count;
        tally.stats.dirs += listing.dir_count;
        tally.stats.bytes += listing.bytes;
        tally.matches += listing.matched.len();
        if self.query.collect_paths {
            tally.paths.extend(listing.matched.iter().map(Entry::full_path));
        }
        self.reporter.scope(scope, listing, &tally.stats);
        tally
    }

    fn fail(&self, tally: &mut Tally, e: SiftError) {
        warn!("{e}");
        if self.query.collect_errors {
            tally.errors.push(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Directory enumeration
// ---------------------------------------------------------------------------

/// Immediate children of `dir`, sorted by name. Nothing is filtered out and
/// links are not followed.
fn read_children(dir: &Path) -> impl Iterator<Item = Result<Entry, SiftError>> + '_ {
    let mut builder = WalkBuilder::new(dir);
    builder
        .standard_filters(false)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .follow_links(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b));

    builder
        .build()
        .filter(|res| !matches!(res, Ok(de) if de.depth() == 0))
        .map(move |res| res.map_err(map_ignore_error).and_then(|de| disk_entry(dir, &de)))
}

fn disk_entry(dir: &Path, de: &DirEntry) -> Result<Entry, SiftError> {
    let meta = de.metadata().map_err(map_ignore_error)?;
    let mut entry = Entry::new(dir, de.file_name().to_string_lossy());

    entry.is_dir   = meta.is_dir();
    entry.size     = if meta.is_dir() { 0 } else { meta.len() };
    entry.modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    entry.created  = meta.created().ok();
    entry.accessed = meta.accessed().ok();
    entry.mode     = mode_of(&meta);

    if meta.file_type().is_symlink() {
        entry.link_target = std::fs::read_link(de.path()).ok();
    }
    Ok(entry)
}

#[cfg(unix)]
fn mode_of(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn mode_of(meta: &std::fs::Metadata) -> u32 {
    if meta.file_type().is_symlink() {
        crate::entry::MODE_SYMLINK
    } else {
        0
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn map_io_error(path: &Path, e: std::io::Error) -> SiftError {
    match e.kind() {
        std::io::ErrorKind::NotFound         => SiftError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => SiftError::PermissionDenied(path.to_path_buf()),
        _ => SiftError::Io { path: path.to_path_buf(), source: e },
    }
}

fn map_ignore_error(e: ignore::Error) -> SiftError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => map_io_error(&path, io_err),
            other => SiftError::Walk(format!("{}: {other}", path.display())),
        },
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::Loop { child, .. }    => SiftError::SymlinkLoop(child),
        ignore::Error::Io(io_err)            => SiftError::Io {
            path:   PathBuf::new(),
            source: io_err,
        },
        other => SiftError::Walk(other.to_string()),
    }
}
