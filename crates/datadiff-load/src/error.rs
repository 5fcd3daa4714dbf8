//! Error types for the load crate.

use std::io;
use std::path::PathBuf;

use crate::encoding::TextEncoding;

/// Problems met while loading one side of a comparison.
///
/// Loaders never fail outright: they substitute placeholder or empty
/// content and report the problem alongside it.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not well-formed JSON.
    #[error("malformed JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// None of the candidate encodings could decode the file.
    #[error("no candidate encoding decodes {path} (tried {tried:?})")]
    Encoding {
        path: PathBuf,
        tried: Vec<TextEncoding>,
    },

    /// The sprite header is not one this tool understands.
    #[error("invalid sprite {path}: {reason}")]
    Sprite { path: PathBuf, reason: String },
}

/// Convenience alias for load results.
pub type LoadResult<T> = Result<T, LoadError>;
