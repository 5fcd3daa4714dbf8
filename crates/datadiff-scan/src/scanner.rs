//! Tree walk and byte-level comparison.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::change::FileChange;
use crate::error::{ScanError, ScanResult};

/// Compares a mod tree against a base tree.
///
/// The base tree is the ground truth: only files under the mod root are
/// visited, so deletions (files present only in the base) are never
/// reported.
#[derive(Clone, Debug)]
pub struct FolderScanner {
    base_dir: PathBuf,
    mod_dir: PathBuf,
    follow_links: bool,
}

impl FolderScanner {
    /// Scanner for the two roots. Links are not followed by default.
    pub fn new(base_dir: impl Into<PathBuf>, mod_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            mod_dir: mod_dir.into(),
            follow_links: false,
        }
    }

    /// Follow symbolic links while walking the mod tree.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn mod_dir(&self) -> &Path {
        &self.mod_dir
    }

    /// Walk the mod tree and report new and changed files.
    ///
    /// The order of the returned list is unspecified.
    pub fn scan(&self) -> ScanResult<Vec<FileChange>> {
        check_root(&self.base_dir)?;
        check_root(&self.mod_dir)?;
        info!(base = %self.base_dir.display(), mod_dir = %self.mod_dir.display(), "scan started");

        let mut changes = Vec::new();
        let mut visited = 0usize;

        for entry in WalkDir::new(&self.mod_dir).follow_links(self.follow_links) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let Some(path) = e.path().map(Path::to_path_buf) else {
                        warn!(error = %e, "walk error without a path; skipping");
                        continue;
                    };
                    if e.depth() == 0 {
                        return Err(ScanError::RootUnreadable {
                            path,
                            source: e.into_io_error().unwrap_or_else(|| io::Error::other("walk failed")),
                        });
                    }
                    warn!(path = %path.display(), error = %e, "cannot walk entry");
                    if let Some(rel) = relative_path(&self.mod_dir, &path) {
                        changes.push(FileChange::comparison_error(rel, e));
                    }
                    continue;
                }
            };
            if !is_file_entry(&entry) {
                continue;
            }
            visited += 1;

            let Some(rel) = relative_path(&self.mod_dir, entry.path()) else {
                continue;
            };
            let base_path = self.base_dir.join(entry.path().strip_prefix(&self.mod_dir).unwrap_or(entry.path()));

            if !base_path.exists() {
                changes.push(FileChange::new_file(rel));
                continue;
            }

            match files_identical(entry.path(), &base_path) {
                Ok(true) => {}
                Ok(false) => changes.push(FileChange::changed(rel)),
                Err(e) => {
                    warn!(path = %rel, error = %e, "comparison failed");
                    changes.push(FileChange::comparison_error(rel, e));
                }
            }
        }

        info!(visited, reported = changes.len(), "scan finished");
        Ok(changes)
    }
}

/// Exact byte equality of two files.
///
/// No normalization happens: files differing only in line endings are
/// different.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let len_a = regular_file_len(a)?;
    let len_b = regular_file_len(b)?;
    if len_a != len_b {
        debug!(a = %a.display(), len_a, len_b, "sizes differ");
        return Ok(false);
    }
    Ok(fs::read(a)? == fs::read(b)?)
}

/// Regular files, and symbolic links that do not resolve to a directory.
///
/// A dangling link still counts as a file; comparing it reports an error.
fn is_file_entry(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

fn regular_file_len(path: &Path) -> io::Result<u64> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }
    Ok(meta.len())
}

fn check_root(path: &Path) -> ScanResult<()> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScanError::RootNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ScanError::RootUnreadable {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }
    fs::read_dir(path).map_err(|source| ScanError::RootUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// `/`-separated path of `path` relative to `root`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
