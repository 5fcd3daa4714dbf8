//! Ordered-fallback text decoding.
//!
//! This is a heuristic, not detection: the first candidate that decodes
//! without error wins, which can pick the wrong encoding for byte sequences
//! that are valid in several of them.

use serde::{Deserialize, Serialize};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// A candidate text encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// UTF-8, with an optional byte-order mark.
    Utf8,
    /// UTF-16 of either endianness; requires a byte-order mark.
    Utf16,
    /// ISO-8859-1; decodes any byte sequence.
    Latin1,
}

impl TextEncoding {
    /// Default candidate order.
    pub fn default_order() -> Vec<Self> {
        vec![Self::Utf8, Self::Utf16, Self::Latin1]
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            Self::Utf16 => {
                let (body, little_endian) = if let Some(body) = bytes.strip_prefix(UTF16_LE_BOM) {
                    (body, true)
                } else if let Some(body) = bytes.strip_prefix(UTF16_BE_BOM) {
                    (body, false)
                } else {
                    return None;
                };
                if body.len() % 2 != 0 {
                    return None;
                }
                let units: Vec<u16> = body
                    .chunks_exact(2)
                    .map(|pair| {
                        let pair = [pair[0], pair[1]];
                        if little_endian {
                            u16::from_le_bytes(pair)
                        } else {
                            u16::from_be_bytes(pair)
                        }
                    })
                    .collect();
                String::from_utf16(&units).ok()
            }
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Decode with the first candidate that accepts the bytes.
pub fn decode_text(bytes: &[u8], candidates: &[TextEncoding]) -> Option<(String, TextEncoding)> {
    candidates
        .iter()
        .find_map(|&enc| enc.decode(bytes).map(|text| (text, enc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_is_stripped() {
        let (text, enc) = decode_text(b"\xEF\xBB\xBFname\tlevel", &TextEncoding::default_order()).unwrap();
        assert_eq!(text, "name\tlevel");
        assert_eq!(enc, TextEncoding::Utf8);
    }

    #[test]
    fn utf16_needs_bom() {
        let le = [0xFF, 0xFE, b'h', 0, b'i', 0];
        assert_eq!(TextEncoding::Utf16.decode(&le).as_deref(), Some("hi"));
        let be = [0xFE, 0xFF, 0, b'h', 0, b'i'];
        assert_eq!(TextEncoding::Utf16.decode(&be).as_deref(), Some("hi"));
        assert_eq!(TextEncoding::Utf16.decode(b"hi"), None);
    }

    #[test]
    fn falls_back_to_latin1() {
        let bytes = b"Sk\xF3ra";
        let (text, enc) = decode_text(bytes, &TextEncoding::default_order()).unwrap();
        assert_eq!(enc, TextEncoding::Latin1);
        assert_eq!(text, "Skóra");
    }

    #[test]
    fn no_candidate_decodes() {
        assert!(decode_text(b"\xFF\xFF\xFF", &[TextEncoding::Utf8]).is_none());
        assert!(decode_text(b"abc", &[]).is_none());
    }
}
