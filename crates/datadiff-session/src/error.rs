//! Error types for diff sessions.

/// Conditions that end a session without a result.
///
/// Per-file load failures are not errors here: they travel with the result
/// as placeholder content plus a [`datadiff_load::LoadError`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// The progress observer asked to stop. Partial results were discarded.
    #[error("comparison cancelled")]
    Cancelled,

    /// Neither side of the pair names a file.
    #[error("no file on either side")]
    NoInput,
}

/// Convenience alias for session results.
pub type SessionResult<T> = Result<T, SessionError>;
