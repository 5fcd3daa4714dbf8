//! Record tables for datadiff.
//!
//! A [`RecordTable`] holds the rows of one side of a tab-delimited file,
//! classifies each row against the row at the same position on the other
//! side, and maintains the filtered visible-row index that maps display
//! positions to real rows.
//!
//! # Key Types
//!
//! - [`RecordTable`] / [`Cell`] / [`CellStyle`] / [`TableStats`] -- One table and its cells
//! - [`FilterState`] / [`SearchQuery`] -- Filter flags and compiled search term
//! - [`SplitTables`] / [`Pane`] -- Side-by-side pair filtered in lock-step
//! - [`PaneSync`] / [`SyncEvent`] -- Shared selection and scroll position
//!
//! The merged single-table presentation is built with [`RecordTable::merged`].

pub mod merged;
pub mod search;
pub mod split;
pub mod sync;
pub mod table;

pub use search::{FilterState, SearchQuery};
pub use split::{Pane, SplitTables};
pub use sync::{PaneSync, SyncEvent};
pub use table::{fit_row, Cell, CellStyle, RecordTable, Row, Side, TableStats};
