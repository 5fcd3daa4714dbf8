//! Line aligner for datadiff.
//!
//! Turns two sequences of comparable tokens into an edit script of maximal
//! Equal / Replace / Delete / Insert runs, refines replaced lines with an
//! inline alignment, and lays both sides out as display rows.
//!
//! # Key Types
//!
//! - [`EditOp`] / [`EditTag`] -- One run of the edit script, from [`align`]
//! - [`Span`] / [`Granularity`] -- Inline changed/unchanged byte ranges, from [`inline_diff`]
//! - [`AlignedView`] / [`AlignedRow`] / [`RowKind`] -- Side-by-side row model

pub mod edit;
pub mod inline;
pub mod view;

pub use edit::{align, EditOp, EditTag};
pub use inline::{inline_diff, Granularity, Span};
pub use view::{AlignedRow, AlignedView, NumberedLine, RowKind, ViewStats};
