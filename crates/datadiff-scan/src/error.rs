//! Error types for the scan crate.

use std::io;
use std::path::PathBuf;

/// Errors that abort a whole scan.
///
/// Failures on individual files never surface here; they are reported as
/// [`ChangeKind::ComparisonError`](crate::ChangeKind::ComparisonError) entries.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A root directory does not exist.
    #[error("directory not found: {0}")]
    RootNotFound(PathBuf),

    /// A root path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A root directory could not be read.
    #[error("cannot read directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for scan results.
pub type ScanResult<T> = Result<T, ScanError>;
