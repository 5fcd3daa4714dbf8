//! Side-by-side row model built from an edit script.

use serde::{Deserialize, Serialize};

use crate::edit::{align, EditOp, EditTag};
use crate::inline::{inline_diff, Granularity, Span};

/// Classification of one aligned row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Both sides hold the same line.
    Equal,
    /// Both sides hold a line, and the lines differ.
    Changed,
    /// Only the left (original) side has a line.
    Removed,
    /// Only the right (modified) side has a line.
    Added,
}

/// A line together with its 1-based line number in its source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedLine {
    /// 1-based line number.
    pub number: usize,
    /// Line text without its terminator.
    pub text: String,
}

/// One row of the side-by-side view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedRow {
    /// How the two sides relate.
    pub kind: RowKind,
    /// Left line, absent for an insertion.
    pub left: Option<NumberedLine>,
    /// Right line, absent for a deletion.
    pub right: Option<NumberedLine>,
    /// Inline spans of the left line; only filled for `Changed` rows.
    pub left_spans: Vec<Span>,
    /// Inline spans of the right line; only filled for `Changed` rows.
    pub right_spans: Vec<Span>,
}

impl AlignedRow {
    fn equal(left: NumberedLine, right: NumberedLine) -> Self {
        Self {
            kind: RowKind::Equal,
            left: Some(left),
            right: Some(right),
            left_spans: Vec::new(),
            right_spans: Vec::new(),
        }
    }

    fn removed(left: NumberedLine) -> Self {
        Self {
            kind: RowKind::Removed,
            left: Some(left),
            right: None,
            left_spans: Vec::new(),
            right_spans: Vec::new(),
        }
    }

    fn added(right: NumberedLine) -> Self {
        Self {
            kind: RowKind::Added,
            left: None,
            right: Some(right),
            left_spans: Vec::new(),
            right_spans: Vec::new(),
        }
    }

    /// Returns `true` unless the row is `Equal`.
    pub fn is_difference(&self) -> bool {
        self.kind != RowKind::Equal
    }
}

/// Row counts per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStats {
    pub equal: usize,
    pub changed: usize,
    pub removed: usize,
    pub added: usize,
}

impl ViewStats {
    /// Rows that are not `Equal`.
    pub fn differences(&self) -> usize {
        self.changed + self.removed + self.added
    }

    /// All rows.
    pub fn total(&self) -> usize {
        self.equal + self.differences()
    }
}

/// Two line sequences aligned into display rows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedView {
    ops: Vec<EditOp>,
    rows: Vec<AlignedRow>,
}

impl AlignedView {
    /// Align `left` against `right`.
    ///
    /// Within a replace run, lines at the same offset are paired as
    /// `Changed` rows with inline spans; the surplus of the longer side
    /// becomes `Removed` or `Added` rows.
    pub fn build<S: AsRef<str> + PartialEq>(left: &[S], right: &[S], granularity: Granularity) -> Self {
        let ops = align(left, right);
        let mut rows = Vec::with_capacity(left.len().max(right.len()));
        let line = |seq: &[S], i: usize| NumberedLine {
            number: i + 1,
            text: seq[i].as_ref().to_string(),
        };

        for op in &ops {
            match op.tag {
                EditTag::Equal => {
                    for (l, r) in op.left.clone().zip(op.right.clone()) {
                        rows.push(AlignedRow::equal(line(left, l), line(right, r)));
                    }
                }
                EditTag::Delete => {
                    rows.extend(op.left.clone().map(|l| AlignedRow::removed(line(left, l))));
                }
                EditTag::Insert => {
                    rows.extend(op.right.clone().map(|r| AlignedRow::added(line(right, r))));
                }
                EditTag::Replace => {
                    let width = op.left.len().max(op.right.len());
                    for k in 0..width {
                        let l = op.left.start + k;
                        let r = op.right.start + k;
                        match (op.left.contains(&l), op.right.contains(&r)) {
                            (true, true) => {
                                let left_line = line(left, l);
                                let right_line = line(right, r);
                                let (left_spans, right_spans) =
                                    inline_diff(&left_line.text, &right_line.text, granularity);
                                rows.push(AlignedRow {
                                    kind: RowKind::Changed,
                                    left: Some(left_line),
                                    right: Some(right_line),
                                    left_spans,
                                    right_spans,
                                });
                            }
                            (true, false) => rows.push(AlignedRow::removed(line(left, l))),
                            (false, true) => rows.push(AlignedRow::added(line(right, r))),
                            (false, false) => {}
                        }
                    }
                }
            }
        }

        Self { ops, rows }
    }

    /// The coalesced edit script the rows were built from.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Every row, in display order.
    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    /// Rows that are not `Equal`, in order.
    pub fn only_differences(&self) -> impl Iterator<Item = &AlignedRow> {
        self.rows.iter().filter(|r| r.is_difference())
    }

    /// The rows to display for the "only differences" toggle.
    pub fn visible_rows(&self, only_differences: bool) -> Vec<&AlignedRow> {
        if only_differences {
            self.only_differences().collect()
        } else {
            self.rows.iter().collect()
        }
    }

    /// Returns `true` if both sides hold the same lines.
    pub fn is_identical(&self) -> bool {
        self.ops.iter().all(EditOp::is_equal)
    }

    /// Count the rows of each kind.
    pub fn stats(&self) -> ViewStats {
        let mut stats = ViewStats::default();
        for row in &self.rows {
            match row.kind {
                RowKind::Equal => stats.equal += 1,
                RowKind::Changed => stats.changed += 1,
                RowKind::Removed => stats.removed += 1,
                RowKind::Added => stats.added += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(left: &[&str], right: &[&str]) -> AlignedView {
        AlignedView::build(left, right, Granularity::Chars)
    }

    fn kinds(view: &AlignedView) -> Vec<RowKind> {
        view.rows().iter().map(|r| r.kind).collect()
    }

    #[test]
    fn identical_inputs() {
        let view = build(&["a", "b"], &["a", "b"]);
        assert!(view.is_identical());
        assert_eq!(kinds(&view), vec![RowKind::Equal, RowKind::Equal]);
        assert_eq!(view.only_differences().count(), 0);
    }

    #[test]
    fn changed_row_gets_inline_spans() {
        let view = build(&["a", "level 10", "c"], &["a", "level 12", "c"]);
        assert_eq!(kinds(&view), vec![RowKind::Equal, RowKind::Changed, RowKind::Equal]);
        let row = &view.rows()[1];
        assert_eq!(row.left.as_ref().map(|l| l.number), Some(2));
        assert_eq!(row.right.as_ref().map(|l| l.number), Some(2));
        assert!(row.left_spans.iter().any(|s| s.changed));
        assert!(row.right_spans.iter().any(|s| s.changed));
    }

    #[test]
    fn uneven_replace_degrades_to_removed() {
        let view = build(&["a", "b", "c", "z"], &["a", "x", "z"]);
        assert_eq!(
            kinds(&view),
            vec![RowKind::Equal, RowKind::Changed, RowKind::Removed, RowKind::Equal]
        );
        let removed = &view.rows()[2];
        assert_eq!(removed.left.as_ref().map(|l| l.text.as_str()), Some("c"));
        assert!(removed.right.is_none());
        assert!(removed.left_spans.is_empty());
    }

    #[test]
    fn insert_and_delete_rows() {
        let view = build(&["a"], &["a", "b", "c"]);
        assert_eq!(kinds(&view), vec![RowKind::Equal, RowKind::Added, RowKind::Added]);
        assert_eq!(view.rows()[2].right.as_ref().map(|l| l.number), Some(3));

        let view = build(&["a", "b"], &[]);
        assert_eq!(kinds(&view), vec![RowKind::Removed, RowKind::Removed]);
    }

    #[test]
    fn line_numbers_follow_each_side() {
        let view = build(&["x", "a", "b"], &["a", "b"]);
        let equal_rows: Vec<_> = view.rows().iter().filter(|r| r.kind == RowKind::Equal).collect();
        assert_eq!(equal_rows[0].left.as_ref().map(|l| l.number), Some(2));
        assert_eq!(equal_rows[0].right.as_ref().map(|l| l.number), Some(1));
    }

    #[test]
    fn only_differences_and_stats() {
        let view = build(&["a", "b", "c"], &["a", "x", "c", "d"]);
        let stats = view.stats();
        assert_eq!(stats.equal, 2);
        assert_eq!(stats.changed, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.total(), view.rows().len());
        assert_eq!(view.visible_rows(true).len(), stats.differences());
        assert_eq!(view.visible_rows(false).len(), stats.total());
    }
}
