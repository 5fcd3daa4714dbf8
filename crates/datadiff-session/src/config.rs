//! Comparison settings and extension-to-content-type mapping.

use datadiff_align::Granularity;
use datadiff_load::TextEncoding;
use serde::{Deserialize, Serialize};

use crate::content::ContentType;

/// Settings injected into a [`DiffSession`](crate::DiffSession).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Candidate encodings, tried in order.
    pub encodings: Vec<TextEncoding>,
    /// Extensions shown as plain text.
    pub text_extensions: Vec<String>,
    /// Extensions canonicalized as JSON.
    pub json_extensions: Vec<String>,
    /// Extensions parsed as tab-delimited tables.
    pub table_extensions: Vec<String>,
    /// Extensions read as sprites.
    pub sprite_extensions: Vec<String>,
    /// Inline highlighting granularity for changed lines.
    pub granularity: Granularity,
    /// Rows parsed between two progress ticks.
    pub progress_interval: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let list = |exts: &[&str]| -> Vec<String> { exts.iter().map(|e| e.to_string()).collect() };
        Self {
            encodings: TextEncoding::default_order(),
            text_extensions: list(&["txt", "md"]),
            json_extensions: list(&["json"]),
            table_extensions: list(&["tsv", "tab"]),
            sprite_extensions: list(&["sprite"]),
            granularity: Granularity::default(),
            progress_interval: 1000,
        }
    }
}

impl SessionConfig {
    /// Content type for a file extension (without the dot, any case).
    pub fn content_type_for(&self, extension: &str) -> ContentType {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        let has = |list: &[String]| list.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext));
        if has(&self.json_extensions) {
            ContentType::Json
        } else if has(&self.table_extensions) {
            ContentType::Table
        } else if has(&self.sprite_extensions) {
            ContentType::Sprite
        } else if has(&self.text_extensions) {
            ContentType::Text
        } else {
            ContentType::Binary
        }
    }
}
