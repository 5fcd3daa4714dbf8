//! Single merged table: modified values styled against the original.

use crate::table::{compare_rows, fit_row, RecordTable, Row, RowMark};

impl RecordTable {
    /// Build the merged presentation of two row lists.
    ///
    /// There is one row per position up to the longer list. A position
    /// present on both sides shows the modified values with per-cell change
    /// marks. A position only in `modified` is added. A position only in
    /// `original` keeps the original values and is marked removed.
    pub fn merged(original: &[Row], modified: &[Row], header: Row) -> Self {
        let width = if header.is_empty() {
            original
                .iter()
                .chain(modified)
                .map(Vec::len)
                .max()
                .unwrap_or(0)
        } else {
            header.len()
        };
        let len = original.len().max(modified.len());
        let mut rows = Vec::with_capacity(len);
        let mut marks = Vec::with_capacity(len);

        for i in 0..len {
            let (row, mark) = match (original.get(i), modified.get(i)) {
                (Some(o), Some(m)) => {
                    let o = fit_row(o.clone(), width);
                    let m = fit_row(m.clone(), width);
                    let mark = compare_rows(&m, &o);
                    (m, mark)
                }
                (None, Some(m)) => (fit_row(m.clone(), width), RowMark::Added),
                (Some(o), None) => (fit_row(o.clone(), width), RowMark::Removed),
                (None, None) => continue,
            };
            rows.push(row);
            marks.push(mark);
        }

        Self::from_parts(fit_row(header, width), rows, marks)
    }
}

#[cfg(test)]
mod tests {
    use crate::search::FilterState;
    use crate::table::{CellStyle, RecordTable, Row};

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn merged_shows_modified_values() {
        let original = vec![row(&["Cap", "1"]), row(&["Crown", "29"])];
        let modified = vec![row(&["Cap", "2"]), row(&["Crown", "29"])];
        let table = RecordTable::merged(&original, &modified, row(&["name", "level"]));
        assert_eq!(table.len(), 2);
        let cell = table.cell_at(0, 1).unwrap();
        assert_eq!(cell.value, "2");
        assert_eq!(cell.style, CellStyle::Changed);
        assert_eq!(table.diff_rows(), &[0]);
    }

    #[test]
    fn merged_marks_added_and_removed() {
        let original = vec![row(&["Cap", "1"]), row(&["Crown", "29"]), row(&["Tiara", "40"])];
        let modified = vec![row(&["Cap", "1"])];
        let table = RecordTable::merged(&original, &modified, row(&["name", "level"]));
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell_at(1, 0).unwrap().value, "Crown");
        assert_eq!(table.cell_at(1, 0).unwrap().style, CellStyle::Removed);
        assert_eq!(table.diff_rows(), &[1, 2]);

        let table = RecordTable::merged(&modified, &original, row(&["name", "level"]));
        assert_eq!(table.cell_at(2, 1).unwrap().style, CellStyle::Added);
    }

    #[test]
    fn merged_filters_like_a_record_table() {
        let original = vec![row(&["Cap", "1"]), row(&["Crown", "29"])];
        let modified = vec![row(&["Cap", "2"]), row(&["Crown", "29"]), row(&["Circlet", "3"])];
        let mut table = RecordTable::merged(&original, &modified, row(&["name", "level"]));
        table.set_filter(FilterState::new(true, "c", false));
        assert_eq!(table.visible_rows(), &[0, 2]);
        let stats = table.stats();
        assert_eq!((stats.visible, stats.visible_diff, stats.total, stats.total_diff), (2, 2, 3, 2));
    }
}
