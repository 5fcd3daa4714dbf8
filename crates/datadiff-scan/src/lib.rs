//! Folder scanner for datadiff.
//!
//! Walks a mod tree, pairs every file with its counterpart under the base
//! tree, and reports files that are new or whose bytes differ. Unchanged
//! files are not reported, and neither are files that exist only in the base
//! tree.
//!
//! # Key Types
//!
//! - [`FolderScanner`] -- Walks and compares the two trees
//! - [`FileChange`] / [`ChangeKind`] -- One reported path
//! - [`ChangeFilter`] -- Kind / extension / free-text filter over a change list
//! - [`Page`] -- One page of a filtered change list

pub mod change;
pub mod error;
pub mod filter;
pub mod scanner;

pub use change::{friendly_folder_name, ChangeKind, FileChange};
pub use error::{ScanError, ScanResult};
pub use filter::{paginate, ChangeFilter, Page};
pub use scanner::{files_identical, FolderScanner};
