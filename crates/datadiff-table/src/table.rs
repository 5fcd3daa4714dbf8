//! Positional row diffing with a filtered visible-row index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::search::{FilterState, SearchQuery};

/// One tab-delimited record.
pub type Row = Vec<String>;

/// Which tree a table's rows come from. Decides how rows without a
/// counterpart on the other side are styled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Rows missing from the other side were removed by the mod.
    Original,
    /// Rows missing from the other side were added by the mod.
    #[default]
    Modified,
}

/// Classification of a real row against its reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RowMark {
    Same,
    /// Sorted column indices whose values differ.
    Changed(Vec<usize>),
    /// Present only on the modified side.
    Added,
    /// Present only on the original side.
    Removed,
}

impl RowMark {
    fn is_diff(&self) -> bool {
        !matches!(self, Self::Same)
    }

    fn cell_differs(&self, col: usize) -> bool {
        match self {
            Self::Same => false,
            Self::Changed(cols) => cols.binary_search(&col).is_ok(),
            Self::Added | Self::Removed => true,
        }
    }
}

/// Presentation style of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStyle {
    Plain,
    /// The value differs from the same field on the other side.
    Changed,
    /// The whole row exists only on the modified side.
    Added,
    /// The whole row exists only on the original side.
    Removed,
    /// The value matches the active search; wins over every diff style.
    SearchHit,
}

/// One cell of the visible table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell<'a> {
    pub value: &'a str,
    /// The value differs from the reference row.
    pub is_diff: bool,
    /// The value matches the active search.
    pub is_search_hit: bool,
    /// How to render the cell.
    pub style: CellStyle,
}

/// Row counts for the current filter.
///
/// `visible_diff <= visible <= total` and `total_diff <= total` always hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    /// Rows shown under the current filter.
    pub visible: usize,
    /// Shown rows that differ.
    pub visible_diff: usize,
    /// All rows.
    pub total: usize,
    /// All rows that differ.
    pub total_diff: usize,
}

/// A table of rows compared position-by-position against a reference.
///
/// Rows are normalized to the header width on construction. Row
/// classification is computed once; each filter change rebuilds the
/// search hits and the visible-row index from scratch.
#[derive(Clone, Debug)]
pub struct RecordTable {
    header: Row,
    rows: Vec<Row>,
    marks: Vec<RowMark>,
    diff_rows: Vec<usize>,
    filter: FilterState,
    /// Real row -> sorted matching columns; only rows with a hit.
    hits: HashMap<usize, Vec<usize>>,
    /// Strictly increasing real row indices.
    visible: Vec<usize>,
    visible_diff: usize,
}

impl RecordTable {
    /// Build a table of `subject` rows compared against `reference` rows.
    ///
    /// A subject row past the end of the reference counts as fully
    /// different and is styled according to `Side::Modified` (added).
    pub fn new(subject: Vec<Row>, reference: &[Row], header: Row) -> Self {
        Self::with_side(subject, reference, header, Side::Modified)
    }

    /// Like [`RecordTable::new`], styling unmatched rows for `side`.
    pub fn with_side(subject: Vec<Row>, reference: &[Row], header: Row, side: Side) -> Self {
        let width = table_width(&header, &subject);
        let rows: Vec<Row> = subject.into_iter().map(|r| fit_row(r, width)).collect();
        let marks = rows
            .iter()
            .enumerate()
            .map(|(i, row)| match reference.get(i) {
                Some(other) => compare_rows(row, other),
                None => match side {
                    Side::Modified => RowMark::Added,
                    Side::Original => RowMark::Removed,
                },
            })
            .collect();
        Self::from_parts(fit_row(header, width), rows, marks)
    }

    pub(crate) fn from_parts(header: Row, rows: Vec<Row>, marks: Vec<RowMark>) -> Self {
        debug_assert_eq!(rows.len(), marks.len());
        let diff_rows: Vec<usize> = marks
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_diff())
            .map(|(i, _)| i)
            .collect();
        let mut table = Self {
            header,
            rows,
            marks,
            diff_rows,
            filter: FilterState::default(),
            hits: HashMap::new(),
            visible: Vec::new(),
            visible_diff: 0,
        };
        table.rebuild_index();
        table
    }

    /// Column names, fitted to the table width.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Number of real rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at real index `real`.
    pub fn row(&self, real: usize) -> Option<&Row> {
        self.rows.get(real)
    }

    /// Returns `true` if the real row differs from the reference.
    pub fn is_diff_row(&self, real: usize) -> bool {
        self.marks.get(real).is_some_and(RowMark::is_diff)
    }

    /// Real indices of all rows that differ from the reference.
    pub fn diff_rows(&self) -> &[usize] {
        &self.diff_rows
    }

    /// The filter currently applied.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Apply new filter flags and rebuild the visible-row index.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.rebuild_index();
    }

    /// Real indices of the rows eligible for display, in order.
    pub fn visible_rows(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Map a display position to its real row.
    pub fn real_row(&self, display: usize) -> Option<usize> {
        self.visible.get(display).copied()
    }

    /// Map a real row to its display position, if it is visible.
    pub fn display_row(&self, real: usize) -> Option<usize> {
        self.visible.binary_search(&real).ok()
    }

    pub fn cell_at(&self, display: usize, col: usize) -> Option<Cell<'_>> {
        let real = self.real_row(display)?;
        self.real_cell(real, col)
    }

    /// Cell by real row index, regardless of the filter.
    pub fn real_cell(&self, real: usize, col: usize) -> Option<Cell<'_>> {
        let value = self.rows.get(real)?.get(col)?;
        let mark = &self.marks[real];
        let is_diff = mark.cell_differs(col);
        let is_search_hit = self
            .hits
            .get(&real)
            .is_some_and(|cols| cols.binary_search(&col).is_ok());
        let style = if is_search_hit {
            CellStyle::SearchHit
        } else {
            match mark {
                RowMark::Added => CellStyle::Added,
                RowMark::Removed => CellStyle::Removed,
                RowMark::Changed(_) if is_diff => CellStyle::Changed,
                _ => CellStyle::Plain,
            }
        };
        Some(Cell {
            value,
            is_diff,
            is_search_hit,
            style,
        })
    }

    /// Style shared by a whole row, for row headers and gutters.
    pub fn row_style(&self, real: usize) -> Option<CellStyle> {
        Some(match self.marks.get(real)? {
            RowMark::Same => CellStyle::Plain,
            RowMark::Changed(_) => CellStyle::Changed,
            RowMark::Added => CellStyle::Added,
            RowMark::Removed => CellStyle::Removed,
        })
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            visible: self.visible.len(),
            visible_diff: self.visible_diff,
            total: self.rows.len(),
            total_diff: self.diff_rows.len(),
        }
    }

    fn rebuild_index(&mut self) {
        let query = SearchQuery::from_filter(&self.filter);
        let only_diff = self.filter.only_differences;
        self.hits.clear();
        self.visible.clear();
        self.visible_diff = 0;

        for (real, row) in self.rows.iter().enumerate() {
            let matched = if query.is_empty() {
                true
            } else {
                let cols: Vec<usize> = row
                    .iter()
                    .enumerate()
                    .filter(|(_, field)| query.matches(field))
                    .map(|(col, _)| col)
                    .collect();
                let any = !cols.is_empty();
                if any {
                    self.hits.insert(real, cols);
                }
                any
            };
            let is_diff = self.marks[real].is_diff();
            if matched && (!only_diff || is_diff) {
                self.visible.push(real);
                if is_diff {
                    self.visible_diff += 1;
                }
            }
        }
        debug!(
            total = self.rows.len(),
            visible = self.visible.len(),
            hits = self.hits.len(),
            "visible index rebuilt"
        );
    }
}

/// Header width, or the widest row when there is no header.
fn table_width(header: &[String], rows: &[Row]) -> usize {
    if header.is_empty() {
        rows.iter().map(Vec::len).max().unwrap_or(0)
    } else {
        header.len()
    }
}

/// Pad with empty fields or truncate to `width`.
pub fn fit_row(mut row: Row, width: usize) -> Row {
    row.resize(width, String::new());
    row
}

/// Compare two rows field-by-field; a missing field reads as empty.
pub(crate) fn compare_rows(row: &[String], other: &[String]) -> RowMark {
    fn field(r: &[String], i: usize) -> &str {
        r.get(i).map_or("", String::as_str)
    }

    let width = row.len().max(other.len());
    let cols: Vec<usize> = (0..width).filter(|&i| field(row, i) != field(other, i)).collect();
    if cols.is_empty() {
        RowMark::Same
    } else {
        RowMark::Changed(cols)
    }
}
