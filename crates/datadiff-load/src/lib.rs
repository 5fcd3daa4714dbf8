//! Content loaders for datadiff.
//!
//! Each loader turns one side of a file pair into the representation the
//! aligner or record table consumes. Loaders recover from every per-file
//! failure locally: they return placeholder or empty content together with
//! the [`LoadError`] that caused it.
//!
//! # Key Types
//!
//! - [`Loaded`] -- Content plus the optional problem met while loading it
//! - [`TextEncoding`] -- Ordered encoding candidates for tolerant decoding
//! - [`JsonEntryDiff`] -- Top-level keyed comparison of two JSON documents
//! - [`TabTable`] -- Rectangular tab-delimited rows with their header
//! - [`Sprite`] / [`SpriteInfo`] / [`SpriteDiff`] -- Sprite header and comparison

pub mod encoding;
pub mod error;
pub mod json;
pub mod loaded;
pub mod sprite;
pub mod table;
pub mod text;

pub use encoding::{decode_text, TextEncoding};
pub use error::{LoadError, LoadResult};
pub use json::{
    canonical_lines, canonicalize_json, load_json_lines, load_json_value, value_kind, EntryKey, JsonEntry, JsonEntryDiff,
    MISSING, NO_FILE,
};
pub use loaded::Loaded;
pub use sprite::{load_sprite, parse_sprite, Sprite, SpriteDiff, SpriteInfo};
pub use table::{load_table, load_table_with, parse_table, parse_table_with, TabTable};
pub use text::{load_text_lines, read_text_file, split_lines};
