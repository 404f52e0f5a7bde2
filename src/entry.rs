use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::kind::{FileKind, WINDOWS_EXECUTABLES};

/// File-type bits of `mode`, in the POSIX `st_mode` layout.
pub const MODE_TYPE_MASK: u32 = 0o170_000;
/// `mode & MODE_TYPE_MASK` for a symbolic link.
pub const MODE_SYMLINK: u32 = 0o120_000;
/// Any of the owner/group/other execute bits.
pub const MODE_EXECUTABLE: u32 = 0o111;

/// One file or directory, wherever it lives: on disk, or inside an archive.
///
/// Entries are produced by the directory enumerator and the archive
/// adapters, read by the condition evaluator, and either kept in a
/// [`ListingSet`](crate::ListingSet) or dropped.
///
/// The classification returned by [`kind()`](Entry::kind) is computed on
/// first use from `is_dir`, `mode` and `name`, then memoized. Later changes
/// to those fields do not reclassify the entry.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Containing directory, or the archive file for archive entries.
    pub path: PathBuf,

    /// Entry name. Archive entries keep their interior directory segments
    /// (`docs/readme.txt`).
    pub name: String,

    /// Byte length; uncompressed length for archive entries.
    pub size: u64,

    /// Last modification time; the Unix epoch when unknown.
    pub modified: SystemTime,

    /// `None` when the platform or archive format cannot supply it.
    pub created: Option<SystemTime>,

    /// `None` when the platform or archive format cannot supply it.
    pub accessed: Option<SystemTime>,

    /// True for directories, including directory entries inside archives.
    pub is_dir: bool,

    /// Permission and type bits, POSIX layout. Zero when unknown.
    pub mode: u32,

    /// Target of a symbolic link; `None` for everything else.
    pub link_target: Option<PathBuf>,

    /// Produced by an archive adapter rather than a directory read.
    pub in_archive: bool,

    /// Printable excerpts around content matches, one per line. Only set
    /// when a content query matched in find-all mode.
    pub excerpt: Option<String>,

    kind: OnceCell<FileKind>,
}

impl Entry {
    /// A zero-sized file entry with no timestamps. Callers fill in the rest.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path:        path.into(),
            name:        name.into(),
            size:        0,
            modified:    SystemTime::UNIX_EPOCH,
            created:     None,
            accessed:    None,
            is_dir:      false,
            mode:        0,
            link_target: None,
            in_archive:  false,
            excerpt:     None,
            kind:        OnceCell::new(),
        }
    }

    /// Last path segment of `name`. Same as `name` outside archives.
    pub fn base_name(&self) -> &str {
        let trimmed = self.name.trim_end_matches('/');
        trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
    }

    /// Upper-case extension (text after the last dot of the base name), or
    /// an empty string. A leading dot alone does not start an extension.
    pub fn extension(&self) -> String {
        let base = self.base_name();
        match base.rfind('.') {
            Some(dot) if dot > 0 => base[dot + 1..].to_uppercase(),
            _ => String::new(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.base_name().starts_with('.')
    }

    pub fn is_symlink(&self) -> bool {
        self.mode & MODE_TYPE_MASK == MODE_SYMLINK
    }

    pub fn has_exec_bit(&self) -> bool {
        self.mode & MODE_EXECUTABLE != 0
    }

    /// Where the entry lives: `path/name`. For archive entries this is a
    /// virtual path through the archive file.
    pub fn full_path(&self) -> PathBuf {
        self.path.join(&self.name)
    }

    pub fn container(&self) -> &Path {
        &self.path
    }

    /// Memoized classification.
    pub fn kind(&self) -> FileKind {
        *self.kind.get_or_init(|| self.classify())
    }

    /// Has [`kind()`](Entry::kind) already been computed?
    pub fn is_classified(&self) -> bool {
        self.kind.get().is_some()
    }

    fn classify(&self) -> FileKind {
        if self.is_dir {
            return FileKind::Directory;
        }
        if self.is_symlink() {
            return FileKind::Symlink;
        }
        let ext = self.extension();
        if self.has_exec_bit() || WINDOWS_EXECUTABLES.contains(&ext.as_str()) {
            return FileKind::Executable;
        }
        if let Some(kind) = FileKind::from_extension(&ext) {
            return kind;
        }
        if self.is_hidden() {
            FileKind::Hidden
        } else {
            FileKind::Default
        }
    }
}
