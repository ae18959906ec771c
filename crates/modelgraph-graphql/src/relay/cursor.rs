//! Connection cursor encoding.
//!
//! Cursors are offset-keyed: URL-safe unpadded base64 of `{"offset": N}`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Cursor data encoded in the cursor string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorData {
    /// Offset into the result set.
    pub offset: usize,
}

impl CursorData {
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// Encode cursor data to a base64 string.
    pub fn encode(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode cursor data from a base64 string.
    pub fn decode(cursor: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(cursor).ok()?;
        let json = String::from_utf8(bytes).ok()?;
        serde_json::from_str(&json).ok()
    }
}

/// Shorthand for encoding an offset.
pub fn offset_to_cursor(offset: usize) -> String {
    CursorData::new(offset).encode()
}

/// Shorthand for decoding a cursor to its offset.
pub fn cursor_to_offset(cursor: &str) -> Option<usize> {
    CursorData::decode(cursor).map(|c| c.offset)
}
