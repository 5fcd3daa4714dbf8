//! Change records produced by a folder scan.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The kind of difference found for a path in the mod tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The path does not exist in the base tree.
    New,
    /// Both trees contain the path and the bytes differ.
    Changed,
    /// Both trees contain the path but reading one side failed.
    ComparisonError,
}

impl ChangeKind {
    /// Short label used in listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "new file",
            Self::Changed => "replaced",
            Self::ComparisonError => "replaced?",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub kind: ChangeKind,
    /// Path relative to the mod root, `/`-separated.
    pub relative_path: String,
    /// Human-readable note; the error text for comparison errors.
    pub detail: Option<String>,
}

impl FileChange {
    /// A file with no counterpart in the base tree.
    pub fn new_file(relative_path: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::New,
            relative_path: relative_path.into(),
            detail: None,
        }
    }

    /// A file whose bytes differ from its counterpart.
    pub fn changed(relative_path: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Changed,
            relative_path: relative_path.into(),
            detail: Some("content changed".into()),
        }
    }

    /// A file that could not be compared.
    pub fn comparison_error(relative_path: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            kind: ChangeKind::ComparisonError,
            relative_path: relative_path.into(),
            detail: Some(format!("comparison failed: {error}")),
        }
    }

    /// The detail text, or an empty string.
    pub fn detail_text(&self) -> &str {
        self.detail.as_deref().unwrap_or("")
    }

    /// Lowercased extension of the relative path, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.relative_path)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

/// Display name for a game-data folder.
///
/// Mods usually ship their files under `<mod>/data`, so a folder literally
/// named `data` is shown by its parent's name instead.
pub fn friendly_folder_name(path: &Path) -> String {
    let base = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return path.to_string_lossy().into_owned(),
    };
    if base.eq_ignore_ascii_case("data") {
        if let Some(parent) = path.parent().and_then(Path::file_name) {
            return parent.to_string_lossy().into_owned();
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_entry_has_detail() {
        let change = FileChange::changed("global/excel/armor.txt");
        assert_eq!(change.kind, ChangeKind::Changed);
        assert_eq!(change.detail_text(), "content changed");
    }

    #[test]
    fn new_entry_has_no_detail() {
        let change = FileChange::new_file("a.json");
        assert_eq!(change.detail, None);
        assert_eq!(change.detail_text(), "");
    }

    #[test]
    fn error_entry_carries_message() {
        let change = FileChange::comparison_error("x.bin", "permission denied");
        assert_eq!(change.kind, ChangeKind::ComparisonError);
        assert_eq!(change.detail_text(), "comparison failed: permission denied");
    }

    #[test]
    fn extension_is_lowercased() {
        let change = FileChange::new_file("hd/items/Ring.SPRITE");
        assert_eq!(change.extension().as_deref(), Some("sprite"));
        assert_eq!(FileChange::new_file("README").extension(), None);
    }

    #[test]
    fn data_folder_uses_parent_name() {
        assert_eq!(friendly_folder_name(Path::new("/mods/Reimagined.mpq/data")), "Reimagined.mpq");
        assert_eq!(friendly_folder_name(Path::new("/mods/Reimagined.mpq/DATA")), "Reimagined.mpq");
        assert_eq!(friendly_folder_name(Path::new("/games/d2r/base")), "base");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ChangeKind::New.to_string(), "new file");
        assert_eq!(ChangeKind::Changed.to_string(), "replaced");
        assert_eq!(ChangeKind::ComparisonError.to_string(), "replaced?");
    }
}
