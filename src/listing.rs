use std::cmp::Ordering;
use std::time::SystemTime;

use crate::entry::Entry;
use crate::query::{SortField, SortOrder};

/// What one scope (a directory or an archive) produced.
///
/// Created fresh per scope, sorted, handed to the
/// [`Reporter`](crate::Reporter), then dropped once recursion into its
/// children has been dispatched.
#[derive(Debug, Default)]
pub struct ListingSet {
    /// Entries that satisfied the query.
    pub matched: Vec<Entry>,
    /// Subdirectory names to recurse into. Empty in archive scopes.
    pub subdirs: Vec<String>,
    /// Archive file names to descend into. Empty in archive scopes.
    pub archives: Vec<String>,
    /// Matched files.
    pub file_count: usize,
    /// Matched directories.
    pub dir_count: usize,
    /// Total size of matched files.
    pub bytes: u64,
}

impl ListingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a matched entry and count it.
    pub fn push(&mut self, entry: Entry) {
        if entry.is_dir {
            self.dir_count += 1;
        } else {
            self.file_count += 1;
            self.bytes += entry.size;
        }
        self.matched.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Order the matched entries.
    ///
    /// With `directories_first`, directories precede files whatever the field
    /// and direction; only the field comparison is reversed when descending.
    pub fn sort(&mut self, order: &SortOrder, case_sensitive: bool) {
        self.subdirs.sort();
        self.archives.sort();
        if order.field == SortField::Unsorted && !order.directories_first {
            return;
        }

        // Stable sort keeps enumeration order among equal keys.
        self.matched.sort_by(|a, b| {
            if order.directories_first && a.is_dir != b.is_dir {
                return if a.is_dir { Ordering::Less } else { Ordering::Greater };
            }
            let by_field = compare(a, b, order.field, case_sensitive);
            if order.ascending { by_field } else { by_field.reverse() }
        });
    }
}

fn compare(a: &Entry, b: &Entry, field: SortField, case_sensitive: bool) -> Ordering {
    let by_name = || compare_names(a, b, case_sensitive);
    match field {
        SortField::Unsorted  => Ordering::Equal,
        SortField::Name      => by_name(),
        SortField::Kind      => a
            .kind()
            .sort_rank()
            .cmp(&b.kind().sort_rank())
            .then_with(|| a.extension().cmp(&b.extension()))
            .then_with(by_name),
        SortField::Extension => a.extension().cmp(&b.extension()).then_with(by_name),
        SortField::Modified  => a.modified.cmp(&b.modified).then_with(by_name),
        SortField::Created   => stamp(a.created).cmp(&stamp(b.created)).then_with(by_name),
        SortField::Accessed  => stamp(a.accessed).cmp(&stamp(b.accessed)).then_with(by_name),
        SortField::Size      => a.size.cmp(&b.size).then_with(by_name),
    }
}

fn compare_names(a: &Entry, b: &Entry, case_sensitive: bool) -> Ordering {
    if case_sensitive {
        a.name.cmp(&b.name)
    } else {
        a.name.to_lowercase().cmp(&b.name.to_lowercase())
    }
}

// Unknown sorts as the zero time.
fn stamp(t: Option<SystemTime>) -> SystemTime {
    t.unwrap_or(SystemTime::UNIX_EPOCH)
}
