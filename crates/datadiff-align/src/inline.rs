//! Inline (intra-line) alignment of two changed lines.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::edit::align;

/// Token size used for inline alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One token per character.
    #[default]
    Chars,
    /// Runs of word characters, runs of whitespace, and single punctuation
    /// characters.
    Words,
}

/// A byte range of a line, flagged as changed or shared with the other side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte range within the line; always on char boundaries.
    pub range: Range<usize>,
    /// Whether this part differs from the other side.
    pub changed: bool,
}

impl Span {
    /// The slice of `line` this span covers.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.range.clone()]
    }
}

/// Align two lines token-by-token and return the spans of each side.
///
/// The spans of a side cover the whole line in order; adjacent spans always
/// differ in their `changed` flag.
pub fn inline_diff(left: &str, right: &str, granularity: Granularity) -> (Vec<Span>, Vec<Span>) {
    let left_tokens = tokenize(left, granularity);
    let right_tokens = tokenize(right, granularity);
    let left_texts: Vec<&str> = left_tokens.iter().map(|r| &left[r.clone()]).collect();
    let right_texts: Vec<&str> = right_tokens.iter().map(|r| &right[r.clone()]).collect();

    let mut left_spans = Vec::new();
    let mut right_spans = Vec::new();
    for op in align(&left_texts, &right_texts) {
        let changed = !op.is_equal();
        push_span(&mut left_spans, byte_range(&left_tokens, op.left, left.len()), changed);
        push_span(&mut right_spans, byte_range(&right_tokens, op.right, right.len()), changed);
    }
    (left_spans, right_spans)
}

/// Byte ranges of the tokens of `line`.
fn tokenize(line: &str, granularity: Granularity) -> Vec<Range<usize>> {
    match granularity {
        Granularity::Chars => line
            .char_indices()
            .map(|(i, c)| i..i + c.len_utf8())
            .collect(),
        Granularity::Words => {
            let mut tokens: Vec<Range<usize>> = Vec::new();
            let mut current: Option<(CharClass, usize)> = None;
            for (i, c) in line.char_indices() {
                let class = CharClass::of(c);
                match current {
                    Some((prev, _)) if prev == class && class != CharClass::Punct => {}
                    Some((_, start)) => {
                        tokens.push(start..i);
                        current = Some((class, i));
                    }
                    None => current = Some((class, i)),
                }
            }
            if let Some((_, start)) = current {
                tokens.push(start..line.len());
            }
            tokens
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Punct,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_alphanumeric() || c == '_' {
            Self::Word
        } else if c.is_whitespace() {
            Self::Space
        } else {
            Self::Punct
        }
    }
}

fn byte_range(tokens: &[Range<usize>], span: Range<usize>, line_len: usize) -> Range<usize> {
    if span.is_empty() {
        return 0..0;
    }
    let start = tokens.get(span.start).map_or(line_len, |t| t.start);
    let end = tokens.get(span.end - 1).map_or(line_len, |t| t.end);
    start..end
}

fn push_span(spans: &mut Vec<Span>, range: Range<usize>, changed: bool) {
    if range.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.changed == changed && last.range.end == range.start {
            last.range.end = range.end;
            return;
        }
    }
    spans.push(Span { range, changed });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed_text<'a>(line: &'a str, spans: &[Span]) -> Vec<&'a str> {
        spans.iter().filter(|s| s.changed).map(|s| s.text(line)).collect()
    }

    #[test]
    fn char_level_marks_only_the_difference() {
        let (l, r) = inline_diff("mindam\t10", "mindam\t12", Granularity::Chars);
        assert_eq!(changed_text("mindam\t10", &l), vec!["0"]);
        assert_eq!(changed_text("mindam\t12", &r), vec!["2"]);
    }

    #[test]
    fn spans_cover_whole_line() {
        let left = "hello world";
        let right = "hallo wereld!";
        let (l, r) = inline_diff(left, right, Granularity::Chars);
        let joined: String = l.iter().map(|s| s.text(left)).collect();
        assert_eq!(joined, left);
        let joined: String = r.iter().map(|s| s.text(right)).collect();
        assert_eq!(joined, right);
        for pair in l.windows(2) {
            assert_ne!(pair[0].changed, pair[1].changed);
        }
    }

    #[test]
    fn word_level_marks_whole_words() {
        let left = "Sword of Fire, 12";
        let right = "Sword of Frost, 12";
        let (l, r) = inline_diff(left, right, Granularity::Words);
        assert_eq!(changed_text(left, &l), vec!["Fire"]);
        assert_eq!(changed_text(right, &r), vec!["Frost"]);
    }

    #[test]
    fn multibyte_chars_keep_boundaries() {
        let left = "zażółć";
        let right = "zażólć";
        let (l, r) = inline_diff(left, right, Granularity::Chars);
        assert_eq!(changed_text(left, &l), vec!["ł"]);
        assert_eq!(changed_text(right, &r), vec!["l"]);
    }

    #[test]
    fn empty_side_has_no_spans() {
        let (l, r) = inline_diff("", "abc", Granularity::Chars);
        assert!(l.is_empty());
        assert_eq!(r, vec![Span { range: 0..3, changed: true }]);
    }

    #[test]
    fn word_tokens() {
        let toks = tokenize("ab  cd,,e", Granularity::Words);
        assert_eq!(toks, vec![0..2, 2..4, 4..6, 6..7, 7..8, 8..9]);
    }
}
