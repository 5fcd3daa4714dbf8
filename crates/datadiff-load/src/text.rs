//! Plain-text line loading.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::encoding::{decode_text, TextEncoding};
use crate::error::{LoadError, LoadResult};
use crate::loaded::Loaded;

/// Read a file and decode it with the first candidate encoding that fits.
pub fn read_text_file(path: &Path, encodings: &[TextEncoding]) -> LoadResult<String> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match decode_text(&bytes, encodings) {
        Some((text, encoding)) => {
            debug!(path = %path.display(), ?encoding, bytes = bytes.len(), "decoded text file");
            Ok(text)
        }
        None => Err(LoadError::Encoding {
            path: path.to_path_buf(),
            tried: encodings.to_vec(),
        }),
    }
}

/// Whether `path` names an existing file side.
pub(crate) fn present(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.exists())
}

/// Split text into lines without their terminators.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A final terminator does
/// not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some(at) = rest.find(|c: char| c == '\r' || c == '\n') else {
            lines.push(rest.to_owned());
            break;
        };
        lines.push(rest[..at].to_owned());
        let width = if rest[at..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[at + width..];
    }
    lines
}

/// Load a text file as a line sequence.
///
/// An absent or nonexistent path yields no lines. A file that cannot be
/// read or decoded yields one placeholder line describing the failure.
pub fn load_text_lines(path: Option<&Path>, encodings: &[TextEncoding]) -> Loaded<Vec<String>> {
    let Some(path) = present(path) else {
        return Loaded::ok(Vec::new());
    };
    match read_text_file(path, encodings) {
        Ok(text) => Loaded::ok(split_lines(&text)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "text load failed");
            Loaded::with_problem(vec![format!("(file load error: {err})")], err)
        }
    }
}
