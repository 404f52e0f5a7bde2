use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiftError {
    // Traversal
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid source: {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("symlink loop: {}", .0.display())]
    SymlinkLoop(PathBuf),

    // Config
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    // Archives
    #[error("could not open archive {}: {reason}", path.display())]
    ArchiveOpenFailed { path: PathBuf, reason: String },

    #[error("invalid password for {}", .0.display())]
    ArchiveAuthFailed(PathBuf),

    #[error("could not extract {entry} from {}: {reason}", archive.display())]
    ExtractionFailed {
        archive: PathBuf,
        entry:   String,
        reason:  String,
    },

    // Content search
    #[error("{0} not found")]
    UtilityNotFound(String),

    #[error("could not create temporary file")]
    TempFileFailed(#[source] std::io::Error),

    // Runtime
    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(String),
}

impl SiftError {
    /// The path this error occurred at, if applicable.
    /// For archive errors this is the archive file itself.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::InvalidSource(p)
            | Self::SymlinkLoop(p)
            | Self::ArchiveAuthFailed(p)
            | Self::ArchiveOpenFailed { path: p, .. }
            | Self::ExtractionFailed { archive: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the traversal can continue after this error.
    ///
    /// Only configuration errors are fatal: they are raised before the first
    /// scope is enumerated. Every other kind is confined to a single entry or
    /// a single scope, which simply yields fewer matches.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidPattern(_) | Self::InvalidRange(_) | Self::InvalidSource(_)
        )
    }

    /// True for the wrong-password case of an encrypted archive, so callers
    /// can say "invalid password" instead of a generic open failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::ArchiveAuthFailed(_))
    }
}
