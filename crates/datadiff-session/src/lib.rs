//! Diff session controller for datadiff.
//!
//! Given a [`FilePair`] and its content type, a [`DiffSession`] loads both
//! sides through the matching loader and drives the aligner or the record
//! tables to produce a [`SessionDiff`]. Loading is sequential and
//! cooperative: a [`Progress`] observer receives ticks and may cancel.
//!
//! # Key Types
//!
//! - [`DiffSession`] / [`SessionConfig`] -- Controller and its injected settings
//! - [`FilePair`] / [`ContentType`] -- What to compare and how
//! - [`Comparison`] / [`SessionDiff`] -- The renderable result and per-side problems
//! - [`Progress`] / [`LoadStage`] / [`NoProgress`] -- Progress ticks and cancellation

pub mod config;
pub mod content;
pub mod error;
pub mod progress;
pub mod session;

pub use config::SessionConfig;
pub use content::{ContentType, FilePair};
pub use error::{SessionError, SessionResult};
pub use progress::{LoadStage, NoProgress, Progress};
pub use session::{Comparison, DiffSession, SessionDiff};
