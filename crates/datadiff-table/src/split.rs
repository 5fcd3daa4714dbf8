//! Side-by-side pair of record tables filtered in lock-step.

use serde::{Deserialize, Serialize};

use crate::search::FilterState;
use crate::table::{RecordTable, Row, Side};

/// One of the two panes of a side-by-side view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pane {
    /// Original side.
    Left,
    /// Modified side.
    Right,
}

impl Pane {
    /// The opposite pane.
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// The original table on the left, the modified table on the right, each
/// compared against the other.
#[derive(Clone, Debug)]
pub struct SplitTables {
    left: RecordTable,
    right: RecordTable,
}

impl SplitTables {
    /// Compare the two row lists against each other.
    pub fn new(original: Vec<Row>, original_header: Row, modified: Vec<Row>, modified_header: Row) -> Self {
        let left = RecordTable::with_side(original.clone(), &modified, original_header, Side::Original);
        let right = RecordTable::with_side(modified, &original, modified_header, Side::Modified);
        Self { left, right }
    }

    /// The original table.
    pub fn left(&self) -> &RecordTable {
        &self.left
    }

    /// The modified table.
    pub fn right(&self) -> &RecordTable {
        &self.right
    }

    pub fn pane(&self, pane: Pane) -> &RecordTable {
        match pane {
            Pane::Left => &self.left,
            Pane::Right => &self.right,
        }
    }

    /// Apply the same filter to both panes.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.left.set_filter(filter.clone());
        self.right.set_filter(filter);
    }

    /// Apply a filter to one pane only.
    pub fn set_pane_filter(&mut self, pane: Pane, filter: FilterState) {
        match pane {
            Pane::Left => self.left.set_filter(filter),
            Pane::Right => self.right.set_filter(filter),
        }
    }

    /// The display row in the other pane showing the same real row.
    pub fn linked_display_row(&self, from: Pane, display: usize) -> Option<usize> {
        let real = self.pane(from).real_row(display)?;
        self.pane(from.other()).display_row(real)
    }
}
