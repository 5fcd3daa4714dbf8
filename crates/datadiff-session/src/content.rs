//! File pairs and their content types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How the two sides of a pair are loaded and compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Line sequence aligned with inline highlighting.
    Text,
    /// Canonical JSON lines, aligned like text.
    Json,
    /// Top-level JSON entries compared by key or index. Never inferred
    /// from an extension.
    JsonEntries,
    /// Tab-delimited rows compared by position.
    Table,
    /// Sprite header and pixel payload.
    Sprite,
    /// Byte equality only.
    Binary,
}

/// The original (left) and modified (right) file of one comparison.
/// Either side may be absent when the file exists on one side only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePair {
    /// Original file.
    pub left: Option<PathBuf>,
    /// Modified file.
    pub right: Option<PathBuf>,
}

impl FilePair {
    pub fn new(left: Option<PathBuf>, right: Option<PathBuf>) -> Self {
        Self { left, right }
    }

    /// Pair two paths, treating a path that does not exist as absent.
    pub fn existing(left: impl Into<PathBuf>, right: impl Into<PathBuf>) -> Self {
        let keep = |p: PathBuf| p.exists().then_some(p);
        Self {
            left: keep(left.into()),
            right: keep(right.into()),
        }
    }

    pub fn left(&self) -> Option<&Path> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Path> {
        self.right.as_deref()
    }

    /// Returns `true` if neither side is present.
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Lowercased extension, taken from the right side first.
    pub fn extension(&self) -> Option<String> {
        self.right()
            .or(self.left())
            .and_then(Path::extension)
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}
