use std::path::{Path, PathBuf};

use glob::Pattern;
use regex::bytes::{Regex, RegexBuilder};

use crate::content::{PdfConverter, SearchLimits};
use crate::entry::Entry;
use crate::error::SiftError;
use crate::range::{DateField, DateRange, SizeRange};

// ---------------------------------------------------------------------------
// Content search configuration
// ---------------------------------------------------------------------------

/// How the content pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Literal text, exact case.
    CaseSensitive,
    /// Literal text, any case.
    CaseInsensitive,
    /// Regular expression, as written.
    Regex,
}

/// The compiled content query.
#[derive(Debug, Clone)]
pub struct TextQuery {
    pub(crate) mode:     ContentMode,
    pub(crate) regex:    Regex,
    pub(crate) find_all: bool,
}

impl TextQuery {
    /// Compile `pattern` for `mode`. Fails on an invalid regular expression.
    pub fn new(mode: ContentMode, pattern: &str, find_all: bool) -> Result<Self, SiftError> {
        let source = match mode {
            ContentMode::Regex => pattern.to_string(),
            ContentMode::CaseSensitive | ContentMode::CaseInsensitive => regex::escape(pattern),
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(mode == ContentMode::CaseInsensitive)
            .build()
            .map_err(|e| SiftError::InvalidPattern(e.to_string()))?;
        Ok(Self { mode, regex, find_all })
    }

    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    pub fn find_all(&self) -> bool {
        self.find_all
    }
}

/// Which text-extraction utility converts PDF files to text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PdfTool {
    /// Look for `pdftotext` next to the running executable, then on `PATH`.
    #[default]
    Auto,
    /// Use this program.
    At(PathBuf),
    /// Never convert PDFs; their content never matches.
    Disabled,
}

// ---------------------------------------------------------------------------
// Name mask
// ---------------------------------------------------------------------------

/// A compiled name glob.
///
/// Case-insensitive masks are stored upper-cased and candidates are
/// upper-cased before comparison, so matching is always case-sensitive
/// underneath.
#[derive(Debug, Clone)]
pub struct NameMask {
    pattern:        Pattern,
    case_sensitive: bool,
}

impl NameMask {
    pub fn new(mask: &str, case_sensitive: bool) -> Result<Self, SiftError> {
        let source = if case_sensitive { mask.to_string() } else { mask.to_uppercase() };
        let pattern = Pattern::new(&source).map_err(|e| SiftError::InvalidPattern(e.to_string()))?;
        Ok(Self { pattern, case_sensitive })
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.case_sensitive {
            self.pattern.matches(name)
        } else {
            self.pattern.matches(&name.to_uppercase())
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    /// Classification rank, then extension, then name.
    Kind,
    /// Extension, then name.
    Extension,
    Modified,
    Created,
    Accessed,
    Size,
    /// Enumeration order.
    Unsorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field:             SortField,
    pub ascending:         bool,
    pub directories_first: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self { field: SortField::Name, ascending: true, directories_first: true }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// The complete, immutable query: every filter, the content search, and
/// the traversal switches.
///
/// Built once by [`QueryBuilder::build`](crate::QueryBuilder::build) and
/// only read afterwards. Every component receives it by reference.
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) mask:               Option<NameMask>,
    pub(crate) case_sensitive:     bool,
    pub(crate) sizes:              SizeRange,
    pub(crate) dates:              DateRange,
    pub(crate) date_field:         DateField,
    pub(crate) include_exts:       Vec<String>,
    pub(crate) exclude_exts:       Vec<String>,
    pub(crate) exclude_dirs:       Vec<String>,
    pub(crate) list_files:         bool,
    pub(crate) list_directories:   bool,
    pub(crate) list_hidden:        bool,
    pub(crate) executables_only:   bool,
    pub(crate) text:               Option<TextQuery>,
    pub(crate) recurse:            bool,
    pub(crate) archives:           bool,
    pub(crate) password:           Option<String>,
    pub(crate) pdf:                PdfConverter,
    pub(crate) temp_dir:           Option<PathBuf>,
    pub(crate) limits:             SearchLimits,
    pub(crate) sort:               SortOrder,
    pub(crate) collect_paths:      bool,
    pub(crate) collect_errors:     bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            mask:             None,
            case_sensitive:   false,
            sizes:            SizeRange::default(),
            dates:            DateRange::default(),
            date_field:       DateField::Modified,
            include_exts:     Vec::new(),
            exclude_exts:     Vec::new(),
            exclude_dirs:     Vec::new(),
            list_files:       true,
            list_directories: true,
            list_hidden:      true,
            executables_only: false,
            text:             None,
            recurse:          false,
            archives:         false,
            password:         None,
            pdf:              PdfConverter::new(PdfTool::Auto),
            temp_dir:         None,
            limits:           SearchLimits::default(),
            sort:             SortOrder::default(),
            collect_paths:    false,
            collect_errors:   false,
        }
    }
}

impl Query {
    pub fn text(&self) -> Option<&TextQuery> {
        self.text.as_ref()
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn descends_into_archives(&self) -> bool {
        self.archives
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// The PDF utility this query converts with, located on first use.
    pub fn pdf_utility(&self) -> Option<&Path> {
        self.pdf.program()
    }

    pub(crate) fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Does an archive's own file name satisfy the mask? False without a mask.
    pub fn mask_matches(&self, name: &str) -> bool {
        self.mask.as_ref().is_some_and(|m| m.matches(name))
    }

    /// Is any component of `dir` on the exclusion list?
    pub(crate) fn excludes_dir(&self, dir: &Path) -> bool {
        !self.exclude_dirs.is_empty()
            && dir.components().any(|c| {
                let part = c.as_os_str().to_string_lossy();
                self.exclude_dirs.iter().any(|x| *x == part)
            })
    }

    /// Evaluate every condition against one on-disk or archive entry.
    ///
    /// Archive entries are read through their archive (`entry.path`). The
    /// PDF utility lookup is kept on the query and shared by every call.
    pub fn matches(&self, entry: &Entry) -> crate::Verdict {
        let content = crate::content::ContentSearcher::new(self);
        crate::condition::Evaluator::new(self, &content).evaluate(entry, false, None)
    }
}
