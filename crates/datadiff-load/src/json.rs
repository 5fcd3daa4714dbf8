//! Canonical JSON line rendering.
//!
//! Documents are parsed to a value tree and re-serialized with sorted keys
//! and two-space indentation, so structurally equal documents produce the
//! same lines whatever their original formatting.
//!
//! [`JsonEntryDiff`] compares the top level of two documents instead:
//! objects entry-by-entry over the sorted union of their keys, arrays
//! element-by-element by index.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::encoding::TextEncoding;
use crate::error::LoadError;
use crate::loaded::Loaded;
use crate::text::{present, read_text_file, split_lines};

/// Placeholder line for a side without a file.
pub const NO_FILE: &str = "(no file)";

/// Recursively order object keys.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Render a value as canonical lines.
pub fn canonical_lines(value: Value) -> Vec<String> {
    let sorted = sort_keys(value);
    // Serializing a Value cannot fail: every key is a string.
    let text = serde_json::to_string_pretty(&sorted).unwrap_or_default();
    split_lines(&text)
}

/// Parse JSON text and render it as canonical lines.
pub fn canonicalize_json(text: &str) -> Result<Vec<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    Ok(canonical_lines(value))
}

/// Load a JSON file as canonical lines.
///
/// The content is never empty: a missing file yields [`NO_FILE`] and a
/// failed load yields one `(JSON load error: ...)` line.
pub fn load_json_lines(path: Option<&Path>, encodings: &[TextEncoding]) -> Loaded<Vec<String>> {
    let Some(path) = present(path) else {
        return Loaded::ok(vec![NO_FILE.to_string()]);
    };
    let result = read_text_file(path, encodings).and_then(|text| {
        canonicalize_json(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    });
    match result {
        Ok(lines) => Loaded::ok(lines),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "JSON load failed");
            Loaded::with_problem(vec![format!("(JSON load error: {err})")], err)
        }
    }
}

/// Key of one top-level entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryKey {
    /// Position in an array.
    Index(usize),
    /// Member name in an object.
    Name(String),
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// One top-level entry and its value on each side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonEntry {
    pub key: EntryKey,
    /// Original value; `None` when the key or index is missing there.
    pub left: Option<Value>,
    /// Modified value; `None` when the key or index is missing there.
    pub right: Option<Value>,
    /// Whether the sides differ. A missing side always differs.
    pub differs: bool,
}

impl JsonEntry {
    fn new(key: EntryKey, left: Option<&Value>, right: Option<&Value>) -> Self {
        Self {
            key,
            differs: left != right,
            left: left.cloned(),
            right: right.cloned(),
        }
    }
}

/// Top-level comparison of two JSON documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JsonEntryDiff {
    /// Both roots are objects, or both are arrays.
    Entries { entries: Vec<JsonEntry> },
    /// The roots are not two objects or two arrays.
    Mismatched { left: String, right: String },
}

impl JsonEntryDiff {
    /// Compare two roots.
    ///
    /// Objects yield one entry per key of either side, in key order.
    /// Arrays yield one entry per index up to the longer length. Any other
    /// pairing is [`JsonEntryDiff::Mismatched`].
    pub fn compare(left: &Value, right: &Value) -> Self {
        match (left, right) {
            (Value::Object(l), Value::Object(r)) => {
                let keys: BTreeSet<&String> = l.keys().chain(r.keys()).collect();
                let entries = keys
                    .into_iter()
                    .map(|k| JsonEntry::new(EntryKey::Name(k.clone()), l.get(k), r.get(k)))
                    .collect();
                Self::Entries { entries }
            }
            (Value::Array(l), Value::Array(r)) => {
                let entries = (0..l.len().max(r.len()))
                    .map(|i| JsonEntry::new(EntryKey::Index(i), l.get(i), r.get(i)))
                    .collect();
                Self::Entries { entries }
            }
            _ => Self::Mismatched {
                left: value_kind(left).to_string(),
                right: value_kind(right).to_string(),
            },
        }
    }

    /// Compare two sides that may lack a document.
    ///
    /// A missing side stands in as the empty container of the other side's
    /// root, so every entry of the present side shows as one-sided.
    pub fn compare_sides(left: Option<&Value>, right: Option<&Value>) -> Self {
        match (left, right) {
            (Some(l), Some(r)) => Self::compare(l, r),
            (Some(l), None) => Self::compare(l, &empty_like(l)),
            (None, Some(r)) => Self::compare(&empty_like(r), r),
            (None, None) => Self::Mismatched {
                left: MISSING.to_string(),
                right: MISSING.to_string(),
            },
        }
    }

    /// Entries, or none for mismatched roots.
    pub fn entries(&self) -> &[JsonEntry] {
        match self {
            Self::Entries { entries } => entries,
            Self::Mismatched { .. } => &[],
        }
    }

    /// Returns `true` if the roots pair up and no entry differs.
    pub fn is_identical(&self) -> bool {
        match self {
            Self::Entries { entries } => entries.iter().all(|e| !e.differs),
            Self::Mismatched { .. } => false,
        }
    }
}

/// Root kind reported for a side without a document.
pub const MISSING: &str = "missing";

/// Short name of a value's JSON type.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Load a JSON file as a value tree.
///
/// An absent or nonexistent path yields `None` without a problem. A failed
/// load yields `None` together with the error.
pub fn load_json_value(path: Option<&Path>, encodings: &[TextEncoding]) -> Loaded<Option<Value>> {
    let Some(path) = present(path) else {
        return Loaded::ok(None);
    };
    let result = read_text_file(path, encodings).and_then(|text| {
        serde_json::from_str::<Value>(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    });
    match result {
        Ok(value) => Loaded::ok(Some(value)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "JSON load failed");
            Loaded::with_problem(None, err)
        }
    }
}

/// The empty container matching `value`'s root.
fn empty_like(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        _ => Value::Object(serde_json::Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    #[test]
    fn key_order_and_whitespace_do_not_matter() {
        let a = canonicalize_json(r#"{"b": [1, 2], "a": {"y": true, "x": null}}"#).unwrap();
        let b = canonicalize_json("{\n\t\"a\":{\"x\":null,\"y\":true},\"b\":[1,2]}").unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0], "{");
        assert_eq!(a[1], "  \"a\": {");
        assert_eq!(a[2], "    \"x\": null,");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let once = canonicalize_json(r#"{"name":"Żółw","stats":{"hp":10,"atk":2}}"#).unwrap();
        let twice = canonicalize_json(&once.join("\n")).unwrap();
        assert_eq!(once, twice);
        assert!(once.iter().any(|l| l.contains("Żółw")));
    }

    #[test]
    fn missing_file_placeholder() {
        let loaded = load_json_lines(None, &TextEncoding::default_order());
        assert_eq!(loaded.content, vec![NO_FILE]);
        assert!(loaded.is_ok());
    }

    #[test]
    fn malformed_document_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"a\": ").unwrap();
        let loaded = load_json_lines(Some(&path), &TextEncoding::default_order());
        assert!(matches!(loaded.problem, Some(LoadError::Parse { .. })));
        assert_eq!(loaded.content.len(), 1);
        assert!(loaded.content[0].starts_with("(JSON load error: "));
    }

    #[test]
    fn object_entries_cover_key_union() {
        let left = json!({"hp": 10, "name": "cap", "old": true});
        let right = json!({"name": "cap", "hp": 12, "new": [1]});
        let diff = JsonEntryDiff::compare(&left, &right);
        let keys: Vec<String> = diff.entries().iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["hp", "name", "new", "old"]);

        let entries = diff.entries();
        assert!(entries[0].differs);
        assert_eq!(entries[0].left, Some(json!(10)));
        assert_eq!(entries[0].right, Some(json!(12)));
        assert!(!entries[1].differs);
        assert_eq!(entries[2].left, None);
        assert!(entries[2].differs);
        assert_eq!(entries[3].right, None);
        assert!(!diff.is_identical());
    }

    #[test]
    fn array_entries_by_index() {
        let left = json!([{"id": 1}, {"id": 2}]);
        let right = json!([{"id": 1}, {"id": 3}, {"id": 4}]);
        let diff = JsonEntryDiff::compare(&left, &right);
        let entries = diff.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].key, EntryKey::Index(0));
        assert!(!entries[0].differs);
        assert!(entries[1].differs);
        assert_eq!(entries[2].key.to_string(), "[2]");
        assert_eq!(entries[2].left, None);
        assert_eq!(entries[2].right, Some(json!({"id": 4})));
    }

    #[test]
    fn equal_documents_are_identical() {
        let diff = JsonEntryDiff::compare(&json!({"a": [1, 2]}), &json!({"a": [1, 2]}));
        assert!(diff.is_identical());
        assert!(JsonEntryDiff::compare(&json!([]), &json!([])).is_identical());
    }

    #[test]
    fn mismatched_roots() {
        let diff = JsonEntryDiff::compare(&json!({"a": 1}), &json!([1]));
        assert_eq!(
            diff,
            JsonEntryDiff::Mismatched {
                left: "object".into(),
                right: "array".into()
            }
        );
        assert!(diff.entries().is_empty());
        assert!(!diff.is_identical());

        let scalar = JsonEntryDiff::compare(&json!("x"), &json!("x"));
        assert!(matches!(scalar, JsonEntryDiff::Mismatched { .. }));
    }

    #[test]
    fn loads_value_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item.json");
        fs::write(&path, "\u{FEFF}{\"id\": 7}").unwrap();
        let loaded = load_json_value(Some(&path), &TextEncoding::default_order());
        assert_eq!(loaded.content, Some(json!({"id": 7})));

        assert_eq!(load_json_value(None, &TextEncoding::default_order()).content, None);

        fs::write(&path, "[1,").unwrap();
        let broken = load_json_value(Some(&path), &TextEncoding::default_order());
        assert_eq!(broken.content, None);
        assert!(matches!(broken.problem, Some(LoadError::Parse { .. })));
    }

    #[test]
    fn missing_side_shows_every_entry_one_sided() {
        let right = json!([10, 20]);
        let diff = JsonEntryDiff::compare_sides(None, Some(&right));
        let entries = diff.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.left.is_none() && e.differs));

        let left = json!({"a": 1});
        let diff = JsonEntryDiff::compare_sides(Some(&left), None);
        assert_eq!(diff.entries()[0].right, None);

        assert!(matches!(
            JsonEntryDiff::compare_sides(None, None),
            JsonEntryDiff::Mismatched { ref left, .. } if left == MISSING
        ));
    }

    #[test]
    fn loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item.json");
        fs::write(&path, "{\"id\": 7}").unwrap();
        let loaded = load_json_lines(Some(&path), &TextEncoding::default_order());
        assert_eq!(loaded.content, vec!["{", "  \"id\": 7", "}"]);
    }
}
