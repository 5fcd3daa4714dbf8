//! Edit scripts over two sequences.
//!
//! Uses the Myers algorithm from the `similar` crate, wrapped in its
//! `Replace` hook so that a deletion directly followed by an insertion is
//! reported as a replacement. The result is then coalesced into maximal runs.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use similar::algorithms::{myers, Capture, Replace};
use similar::DiffTag;

/// The kind of an edit run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditTag {
    /// Both ranges hold equal elements.
    Equal,
    /// The left range was replaced by the right range.
    Replace,
    /// The left range is missing on the right.
    Delete,
    /// The right range is missing on the left.
    Insert,
}

/// One run of an edit script.
///
/// `left` and `right` are half-open index ranges. For `Delete` the right
/// range is empty, for `Insert` the left range is empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditOp {
    /// What happened to this run.
    pub tag: EditTag,
    /// Indices into the left sequence.
    pub left: Range<usize>,
    /// Indices into the right sequence.
    pub right: Range<usize>,
}

impl EditOp {
    /// Build an op from its tag and both half-open ranges.
    pub fn new(tag: EditTag, left_start: usize, left_end: usize, right_start: usize, right_end: usize) -> Self {
        Self {
            tag,
            left: left_start..left_end,
            right: right_start..right_end,
        }
    }

    /// An `Equal` run.
    pub fn equal(left_start: usize, left_end: usize, right_start: usize, right_end: usize) -> Self {
        Self::new(EditTag::Equal, left_start, left_end, right_start, right_end)
    }

    /// A `Replace` run.
    pub fn replace(left_start: usize, left_end: usize, right_start: usize, right_end: usize) -> Self {
        Self::new(EditTag::Replace, left_start, left_end, right_start, right_end)
    }

    /// A `Delete` run; the right range is empty at `right_at`.
    pub fn delete(left_start: usize, left_end: usize, right_at: usize) -> Self {
        Self::new(EditTag::Delete, left_start, left_end, right_at, right_at)
    }

    /// An `Insert` run; the left range is empty at `left_at`.
    pub fn insert(left_at: usize, right_start: usize, right_end: usize) -> Self {
        Self::new(EditTag::Insert, left_at, left_at, right_start, right_end)
    }

    /// Returns `true` if this run is unchanged.
    pub fn is_equal(&self) -> bool {
        self.tag == EditTag::Equal
    }
}

/// Compute the edit script turning `left` into `right`.
///
/// The ops partition `0..left.len()` and `0..right.len()` in order. Two
/// empty inputs give an empty script. The output is a pure function of the
/// inputs.
pub fn align<T: PartialEq>(left: &[T], right: &[T]) -> Vec<EditOp> {
    let mut hook = Replace::new(Capture::new());
    myers::diff(&mut hook, left, 0..left.len(), right, 0..right.len())
        .unwrap_or_else(|never| match never {});
    let raw = hook.into_inner().into_ops();

    let mut ops: Vec<EditOp> = Vec::with_capacity(raw.len());
    for op in raw {
        let (tag, left_range, right_range) = op.as_tag_tuple();
        if left_range.is_empty() && right_range.is_empty() {
            continue;
        }
        let tag = match tag {
            DiffTag::Equal => EditTag::Equal,
            DiffTag::Delete => EditTag::Delete,
            DiffTag::Insert => EditTag::Insert,
            DiffTag::Replace => EditTag::Replace,
        };
        push_coalesced(&mut ops, EditOp { tag, left: left_range, right: right_range });
    }
    ops
}

/// Append `next`, merging it into the last op when both are equal runs or
/// both are change runs.
fn push_coalesced(ops: &mut Vec<EditOp>, next: EditOp) {
    if let Some(last) = ops.last_mut() {
        let both_equal = last.is_equal() && next.is_equal();
        let both_changes = !last.is_equal() && !next.is_equal();
        if both_equal || both_changes {
            last.left.end = next.left.end;
            last.right.end = next.right.end;
            if both_changes {
                last.tag = change_tag(&last.left, &last.right);
            }
            return;
        }
    }
    ops.push(next);
}

fn change_tag(left: &Range<usize>, right: &Range<usize>) -> EditTag {
    match (left.is_empty(), right.is_empty()) {
        (false, false) => EditTag::Replace,
        (false, true) => EditTag::Delete,
        _ => EditTag::Insert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn single_replacement_in_the_middle() {
        let ops = align(&lines(&["a", "b", "c"]), &lines(&["a", "x", "c"]));
        assert_eq!(
            ops,
            vec![
                EditOp::equal(0, 1, 0, 1),
                EditOp::replace(1, 2, 1, 2),
                EditOp::equal(2, 3, 2, 3),
            ]
        );
    }

    #[test]
    fn empty_left_is_one_insert() {
        let ops = align(&lines(&[]), &lines(&["a"]));
        assert_eq!(ops, vec![EditOp::insert(0, 0, 1)]);
    }

    #[test]
    fn empty_right_is_one_delete() {
        let ops = align(&lines(&["a", "b"]), &lines(&[]));
        assert_eq!(ops, vec![EditOp::delete(0, 2, 0)]);
    }

    #[test]
    fn both_empty_is_empty_script() {
        let ops = align::<String>(&[], &[]);
        assert!(ops.is_empty());
    }

    #[test]
    fn identical_is_single_equal_run() {
        let seq = lines(&["x", "y", "z"]);
        assert_eq!(align(&seq, &seq), vec![EditOp::equal(0, 3, 0, 3)]);
    }

    #[test]
    fn pure_insertion_in_the_middle() {
        let ops = align(&lines(&["a", "c"]), &lines(&["a", "b", "c"]));
        assert_eq!(
            ops,
            vec![EditOp::equal(0, 1, 0, 1), EditOp::insert(1, 1, 2), EditOp::equal(1, 2, 2, 3)]
        );
    }

    #[test]
    fn replace_with_unequal_lengths() {
        let ops = align(&lines(&["a", "b", "c", "z"]), &lines(&["a", "x", "z"]));
        assert_eq!(
            ops,
            vec![EditOp::equal(0, 1, 0, 1), EditOp::replace(1, 3, 1, 2), EditOp::equal(3, 4, 2, 3)]
        );
    }

    #[test]
    fn output_is_repeatable() {
        let left = lines(&["a", "b", "a", "b", "c"]);
        let right = lines(&["b", "a", "c", "a", "b"]);
        assert_eq!(align(&left, &right), align(&left, &right));
    }

    #[test]
    fn works_on_chars() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        let ops = align(&a, &b);
        assert_eq!(ops.first().map(|o| o.tag), Some(EditTag::Replace));
        assert_eq!(ops.last().map(|o| o.left.end), Some(a.len()));
        assert_eq!(ops.last().map(|o| o.right.end), Some(b.len()));
    }

    fn reconstruct<T: Clone>(seq: &[T], ops: &[EditOp], left_side: bool) -> Vec<T> {
        ops.iter()
            .flat_map(|op| {
                let range = if left_side { op.left.clone() } else { op.right.clone() };
                seq[range].to_vec()
            })
            .collect()
    }

    proptest! {
        #[test]
        fn ops_partition_both_sides(
            left in proptest::collection::vec("[abc]", 0..24),
            right in proptest::collection::vec("[abc]", 0..24),
        ) {
            let ops = align(&left, &right);
            prop_assert_eq!(reconstruct(&left, &ops, true), left.clone());
            prop_assert_eq!(reconstruct(&right, &ops, false), right.clone());

            let mut l = 0;
            let mut r = 0;
            for op in &ops {
                prop_assert_eq!(op.left.start, l);
                prop_assert_eq!(op.right.start, r);
                l = op.left.end;
                r = op.right.end;
                match op.tag {
                    EditTag::Equal => {
                        prop_assert_eq!(op.left.len(), op.right.len());
                        prop_assert_eq!(&left[op.left.clone()], &right[op.right.clone()]);
                    }
                    EditTag::Delete => prop_assert!(op.right.is_empty() && !op.left.is_empty()),
                    EditTag::Insert => prop_assert!(op.left.is_empty() && !op.right.is_empty()),
                    EditTag::Replace => prop_assert!(!op.left.is_empty() && !op.right.is_empty()),
                }
            }
            prop_assert_eq!(l, left.len());
            prop_assert_eq!(r, right.len());
        }

        #[test]
        fn runs_are_maximal(
            left in proptest::collection::vec("[ab]", 0..16),
            right in proptest::collection::vec("[ab]", 0..16),
        ) {
            let ops = align(&left, &right);
            for pair in ops.windows(2) {
                prop_assert!(pair[0].is_equal() != pair[1].is_equal());
            }
        }
    }
}
