//! Case-insensitive field search.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Filter flags applied to a table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Hide rows equal to the reference.
    pub only_differences: bool,
    /// Search term; empty disables searching.
    pub search: String,
    /// Match the term only as a whole word.
    pub whole_words: bool,
}

impl FilterState {
    pub fn new(only_differences: bool, search: impl Into<String>, whole_words: bool) -> Self {
        Self {
            only_differences,
            search: search.into(),
            whole_words,
        }
    }
}

/// A compiled search term.
///
/// Matching lowercases the field and compares it against the lowercased
/// term, either as a substring or bounded by word boundaries.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    term: String,
    word_pattern: Option<Regex>,
}

impl SearchQuery {
    /// Compile a query. A term the word pattern rejects falls back to substring search.
    pub fn new(text: &str, whole_words: bool) -> Self {
        let term = text.to_lowercase();
        let word_pattern = if whole_words && !term.is_empty() {
            let pattern = format!(r"\b{}\b", regex::escape(&term));
            match Regex::new(&pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(error = %e, "whole-word pattern rejected; using substring search");
                    None
                }
            }
        } else {
            None
        };
        Self { term, word_pattern }
    }

    pub fn from_filter(filter: &FilterState) -> Self {
        Self::new(&filter.search, filter.whole_words)
    }

    /// An empty query matches every row and highlights no cell.
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    /// Returns `true` if `field` contains the term. Never true for an empty query.
    pub fn matches(&self, field: &str) -> bool {
        if self.term.is_empty() {
            return false;
        }
        let field = field.to_lowercase();
        match &self.word_pattern {
            Some(re) => re.is_match(&field),
            None => field.contains(&self.term),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_word_does_not_match_inside_word() {
        let q = SearchQuery::new("cat", true);
        assert!(!q.matches("category"));
        assert!(q.matches("the cat sat"));
        assert!(q.matches("CAT"));
        assert!(q.matches("cat,dog"));
    }

    #[test]
    fn substring_matches_inside_word() {
        let q = SearchQuery::new("cat", false);
        assert!(q.matches("category"));
        assert!(q.matches("Concatenate"));
        assert!(!q.matches("dog"));
    }

    #[test]
    fn search_is_case_insensitive() {
        let q = SearchQuery::new("Ring", false);
        assert!(q.matches("ring of fire"));
        assert!(q.matches("RING"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let q = SearchQuery::new("a.b", true);
        assert!(q.matches("x a.b y"));
        assert!(!q.matches("x acb y"));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let q = SearchQuery::new("", true);
        assert!(q.is_empty());
        assert!(!q.matches("anything"));
    }
}
