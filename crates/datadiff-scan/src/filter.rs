//! Filtering and paging of a change list.

use serde::{Deserialize, Serialize};

use crate::change::{ChangeKind, FileChange};

/// Criteria for narrowing a change list.
///
/// Every criterion left at its default matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    /// Keep only this kind.
    pub kind: Option<ChangeKind>,
    /// Path suffix such as `.json` or `json`, matched case-insensitively.
    pub extension: Option<String>,
    /// Case-insensitive substring of the path or the detail text.
    pub search: String,
}

impl ChangeFilter {
    /// A filter that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: ChangeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Keep paths ending in `ext`, with or without the dot.
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Keep changes whose path or detail contains `text`.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Returns `true` if the change passes every criterion.
    pub fn matches(&self, change: &FileChange) -> bool {
        if let Some(kind) = self.kind {
            if change.kind != kind {
                return false;
            }
        }
        let path = change.relative_path.to_lowercase();
        if let Some(ext) = &self.extension {
            let ext = ext.trim().to_lowercase();
            let suffix = if ext.starts_with('.') { ext } else { format!(".{ext}") };
            if !path.ends_with(&suffix) {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !path.contains(&needle)
            && !change.detail_text().to_lowercase().contains(&needle)
        {
            return false;
        }
        true
    }

    /// The matching changes, sorted by path.
    pub fn apply<'a>(&self, changes: &'a [FileChange]) -> Vec<&'a FileChange> {
        let mut out: Vec<&FileChange> = changes.iter().filter(|c| self.matches(c)).collect();
        out.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        out
    }
}

/// One page of a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// 1-based page number actually shown.
    pub page: usize,
    /// Always at least 1, even for an empty list.
    pub page_count: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// Slice `items` into pages of `page_size` and return page `page` (1-based),
/// clamped to the valid range.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let page_count = items.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    Page {
        items: &items[start.min(end)..end],
        page,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FileChange> {
        vec![
            FileChange::changed("global/excel/weapons.txt"),
            FileChange::new_file("hd/items/ring.sprite"),
            FileChange::new_file("local/lng/strings/item-names.json"),
            FileChange::comparison_error("global/excel/armor.txt", "permission denied"),
        ]
    }

    #[test]
    fn empty_filter_matches_all_sorted() {
        let changes = sample();
        let out = ChangeFilter::new().apply(&changes);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].relative_path, "global/excel/armor.txt");
        assert_eq!(out[3].relative_path, "local/lng/strings/item-names.json");
    }

    #[test]
    fn filter_by_kind() {
        let changes = sample();
        let out = ChangeFilter::new().kind(ChangeKind::New).apply(&changes);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.kind == ChangeKind::New));
    }

    #[test]
    fn filter_by_extension_with_or_without_dot() {
        let changes = sample();
        assert_eq!(ChangeFilter::new().extension(".TXT").apply(&changes).len(), 2);
        assert_eq!(ChangeFilter::new().extension("json").apply(&changes).len(), 1);
    }

    #[test]
    fn search_covers_path_and_detail() {
        let changes = sample();
        assert_eq!(ChangeFilter::new().search("RING").apply(&changes).len(), 1);
        assert_eq!(ChangeFilter::new().search("permission").apply(&changes).len(), 1);
        assert_eq!(ChangeFilter::new().search("content changed").apply(&changes).len(), 1);
    }

    #[test]
    fn pages_are_clamped() {
        let items: Vec<u32> = (0..250).collect();
        let p = paginate(&items, 100, 3);
        assert_eq!(p.items.len(), 50);
        assert_eq!(p.page_count, 3);
        assert!(p.has_prev());
        assert!(!p.has_next());

        let p = paginate(&items, 100, 99);
        assert_eq!(p.page, 3);
        let p = paginate(&items, 100, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.items[0], 0);
    }

    #[test]
    fn empty_list_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let p = paginate(&items, 100, 1);
        assert_eq!(p.page_count, 1);
        assert!(p.items.is_empty());
        assert!(!p.has_next());
    }
}
