//! Sprite header parsing and comparison.
//!
//! Layout (little-endian): magic `'S'` at byte 0 and `'1'` at byte 3,
//! `u16` version at 4, `u32` width at 8, `u32` height at 12, `u32` frame
//! count at 0x14 and RGBA pixel data from 0x28.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::loaded::Loaded;
use crate::text::present;

const RGBA_VERSION: u16 = 31;
const FRAME_COUNT_OFFSET: usize = 0x14;
const PIXEL_OFFSET: usize = 0x28;
const BYTES_PER_PIXEL: u64 = 4;

/// Decoded sprite header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteInfo {
    /// Format version; only the RGBA version is accepted.
    pub version: u16,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Declared frame count.
    pub frames: u32,
}

impl SpriteInfo {
    /// Bytes of one RGBA frame.
    pub fn frame_size(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * BYTES_PER_PIXEL
    }
}

/// A parsed sprite: header plus its pixel payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub info: SpriteInfo,
    /// RGBA bytes of the first frame.
    pub pixels: Vec<u8>,
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at + 2)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Parse sprite bytes. The error is a human-readable reason.
pub fn parse_sprite(bytes: &[u8]) -> Result<Sprite, String> {
    if bytes.first() != Some(&b'S') || bytes.get(3) != Some(&b'1') {
        return Err("bad magic".to_string());
    }
    let version = read_u16(bytes, 4).ok_or("truncated header")?;
    if version != RGBA_VERSION {
        return Err(format!("unsupported version {version}"));
    }
    let width = read_u32(bytes, 8).ok_or("truncated header")?;
    let height = read_u32(bytes, 12).ok_or("truncated header")?;
    let frames = if bytes.len() >= FRAME_COUNT_OFFSET + 4 {
        read_u32(bytes, FRAME_COUNT_OFFSET).unwrap_or(1)
    } else {
        1
    };
    let info = SpriteInfo {
        version,
        width,
        height,
        frames,
    };

    let payload = bytes.get(PIXEL_OFFSET..).unwrap_or_default();
    let frame_size = info.frame_size();
    if (payload.len() as u64) < frame_size {
        return Err(format!(
            "first frame needs {frame_size} bytes, file has {}",
            payload.len()
        ));
    }
    let wanted = frame_size.saturating_mul(u64::from(frames.max(1)));
    let take = usize::try_from(wanted).map_or(payload.len(), |w| w.min(payload.len()));
    Ok(Sprite {
        info,
        pixels: payload[..take].to_vec(),
    })
}

/// Load a sprite file. An absent or missing path yields `None`.
pub fn load_sprite(path: Option<&Path>) -> Loaded<Option<Sprite>> {
    let Some(path) = present(path) else {
        return Loaded::ok(None);
    };
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) => {
            return Loaded::with_problem(
                None,
                LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            )
        }
    };
    match parse_sprite(&bytes) {
        Ok(sprite) => {
            debug!(path = %path.display(), width = sprite.info.width, height = sprite.info.height, "parsed sprite");
            Loaded::ok(Some(sprite))
        }
        Err(reason) => {
            warn!(path = %path.display(), %reason, "sprite parse failed");
            Loaded::with_problem(
                None,
                LoadError::Sprite {
                    path: path.to_path_buf(),
                    reason,
                },
            )
        }
    }
}

/// Field-by-field comparison of two sprites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteDiff {
    /// Header of the original sprite, if it loaded.
    pub left: Option<SpriteInfo>,
    /// Header of the modified sprite, if it loaded.
    pub right: Option<SpriteInfo>,
    pub same_version: bool,
    /// Width and height both match.
    pub same_size: bool,
    pub same_frames: bool,
    /// First-frame pixel bytes match.
    pub same_pixels: bool,
}

impl SpriteDiff {
    /// Compare two sprites. Two missing sides count as equal.
    pub fn compare(left: Option<&Sprite>, right: Option<&Sprite>) -> Self {
        let (l, r) = (left.map(|s| s.info), right.map(|s| s.info));
        let both = |f: fn(&SpriteInfo, &SpriteInfo) -> bool| match (&l, &r) {
            (Some(a), Some(b)) => f(a, b),
            (None, None) => true,
            _ => false,
        };
        let same_pixels = match (left, right) {
            (Some(a), Some(b)) => a.pixels == b.pixels,
            (None, None) => true,
            _ => false,
        };
        Self {
            left: l,
            right: r,
            same_version: both(|a, b| a.version == b.version),
            same_size: both(|a, b| a.width == b.width && a.height == b.height),
            same_frames: both(|a, b| a.frames == b.frames),
            same_pixels,
        }
    }

    /// Returns `true` if every field matches.
    pub fn is_identical(&self) -> bool {
        self.same_version && self.same_size && self.same_frames && self.same_pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite_bytes(width: u32, height: u32, frames: Option<u32>, fill: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; PIXEL_OFFSET];
        bytes[0] = b'S';
        bytes[3] = b'1';
        bytes[4..6].copy_from_slice(&RGBA_VERSION.to_le_bytes());
        bytes[8..12].copy_from_slice(&width.to_le_bytes());
        bytes[12..16].copy_from_slice(&height.to_le_bytes());
        let frames = frames.unwrap_or(1);
        bytes[0x14..0x18].copy_from_slice(&frames.to_le_bytes());
        let pixels = (width * height * 4 * frames) as usize;
        bytes.extend(std::iter::repeat(fill).take(pixels));
        bytes
    }

    #[test]
    fn parses_header() {
        let sprite = parse_sprite(&sprite_bytes(2, 3, Some(2), 7)).unwrap();
        assert_eq!(
            sprite.info,
            SpriteInfo {
                version: 31,
                width: 2,
                height: 3,
                frames: 2
            }
        );
        assert_eq!(sprite.pixels.len(), 48);
    }

    #[test]
    fn rejects_bad_headers() {
        assert_eq!(parse_sprite(b"X001").unwrap_err(), "bad magic");
        let mut old = sprite_bytes(1, 1, None, 0);
        old[4] = 30;
        assert!(parse_sprite(&old).unwrap_err().contains("version 30"));
        let mut short = sprite_bytes(4, 4, None, 0);
        short.truncate(PIXEL_OFFSET + 10);
        assert!(parse_sprite(&short).unwrap_err().starts_with("first frame"));
    }

    #[test]
    fn short_header_defaults_to_one_frame() {
        let mut bytes = vec![b'S', 0, 0, b'1'];
        bytes.extend_from_slice(&RGBA_VERSION.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let sprite = parse_sprite(&bytes).unwrap();
        assert_eq!(sprite.info.frames, 1);
        assert!(sprite.pixels.is_empty());
    }

    #[test]
    fn compare_reports_each_field() {
        let a = parse_sprite(&sprite_bytes(2, 2, None, 1)).unwrap();
        let b = parse_sprite(&sprite_bytes(2, 2, None, 2)).unwrap();
        let diff = SpriteDiff::compare(Some(&a), Some(&b));
        assert!(diff.same_size && diff.same_frames && diff.same_version);
        assert!(!diff.same_pixels);
        assert!(!diff.is_identical());
        assert!(SpriteDiff::compare(Some(&a), Some(&a)).is_identical());

        let missing = SpriteDiff::compare(Some(&a), None);
        assert!(!missing.same_size);
        assert_eq!(missing.right, None);
    }

    #[test]
    fn load_reports_invalid_sprite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.sprite");
        fs::write(&path, b"nope").unwrap();
        let loaded = load_sprite(Some(&path));
        assert!(loaded.content.is_none());
        assert!(matches!(loaded.problem, Some(LoadError::Sprite { .. })));
    }
}
