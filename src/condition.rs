use crate::archive::{ArchiveKind, EntryBytes};
use crate::content::ContentSearcher;
use crate::entry::Entry;
use crate::kind::WINDOWS_EXECUTABLES;
use crate::query::Query;
use crate::range::DateField;

/// Outcome of evaluating one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub matched: bool,
    /// Find-all excerpts, one per line, when a content query matched.
    pub excerpt: Option<String>,
}

impl Verdict {
    fn reject() -> Self {
        Self::default()
    }

    fn accept(excerpt: Option<String>) -> Self {
        Self { matched: true, excerpt }
    }
}

/// Applies a [`Query`] to entries, cheapest checks first.
pub(crate) struct Evaluator<'a> {
    query:   &'a Query,
    content: &'a ContentSearcher<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(query: &'a Query, content: &'a ContentSearcher<'a>) -> Self {
        Self { query, content }
    }

    /// Every check that needs nothing but the entry's own fields.
    ///
    /// `pass_through` means the archive holding `entry` was itself selected
    /// by the mask, so archive entries skip the name check.
    pub fn passes_metadata(&self, entry: &Entry, pass_through: bool) -> bool {
        let q = self.query;

        if entry.is_dir && !q.list_directories {
            return false;
        }
        if !entry.is_dir && !q.list_files {
            return false;
        }

        if !entry.is_dir && !(q.exclude_exts.is_empty() && q.include_exts.is_empty()) {
            let ext = entry.extension();
            if q.exclude_exts.contains(&ext) {
                return false;
            }
            if !q.include_exts.is_empty() && !q.include_exts.contains(&ext) {
                return false;
            }
        }

        if !q.list_hidden && entry.is_hidden() {
            return false;
        }

        if !q.dates.is_open() {
            let stamp = match q.date_field {
                DateField::Modified => Some(entry.modified),
                DateField::Created  => entry.created,
                DateField::Accessed => entry.accessed,
            };
            if !q.dates.contains(stamp) {
                return false;
            }
        }

        if !entry.is_dir && !q.sizes.contains(entry.size) {
            return false;
        }

        match &q.mask {
            Some(_) if entry.in_archive && pass_through => true,
            Some(mask) => mask.matches(entry.base_name()),
            None => true,
        }
    }

    /// Full evaluation: metadata, then content, then the executable filter.
    ///
    /// `loader` is the payload handle of an archive entry visited during a
    /// fused archive pass. Without it, archive entries are extracted by name.
    pub fn evaluate(
        &self,
        entry: &Entry,
        pass_through: bool,
        loader: Option<&mut dyn EntryBytes>,
    ) -> Verdict {
        if !self.passes_metadata(entry, pass_through) {
            return Verdict::reject();
        }

        let mut excerpt = None;
        if self.query.text.is_some() {
            if entry.is_dir {
                return Verdict::reject();
            }
            let hit = if entry.in_archive {
                self.content.search_archive_entry(entry, loader)
            } else if self.is_selected_container(entry) {
                // Kept whole; its interior is searched in its own scope.
                return self.executable_check(entry, None);
            } else {
                self.content.search_disk(entry)
            };
            if !hit.found {
                return Verdict::reject();
            }
            excerpt = hit.excerpt();
        }

        self.executable_check(entry, excerpt)
    }

    /// An on-disk archive picked out by name while archive descent is on.
    fn is_selected_container(&self, entry: &Entry) -> bool {
        self.query.archives
            && !entry.in_archive
            && ArchiveKind::from_name(&entry.name).is_archive()
            && self.query.mask_matches(&entry.name)
    }

    fn executable_check(&self, entry: &Entry, excerpt: Option<String>) -> Verdict {
        if self.query.executables_only && !is_executable(entry) {
            return Verdict::reject();
        }
        Verdict::accept(excerpt)
    }
}

fn is_executable(entry: &Entry) -> bool {
    if cfg!(windows) {
        WINDOWS_EXECUTABLES.contains(&entry.extension().as_str())
    } else {
        !entry.is_dir && entry.has_exec_bit()
    }
}
