//! Bounded gamertag text
//!
//! Gamertags live in a 16-byte field on the console: up to 15 visible
//! characters followed by a NUL terminator. Oversized input is clamped,
//! never rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TextFit;

/// Maximum visible length of a gamertag, in bytes
pub const GAMERTAG_MAX_LEN: usize = 15;

/// Size of the fixed gamertag field including the terminator
pub const GAMERTAG_FIELD_SIZE: usize = GAMERTAG_MAX_LEN + 1;

/// A gamertag that always fits its fixed console field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Gamertag(String);

impl Gamertag {
    /// Copy `text` into a gamertag, dropping whatever does not fit.
    ///
    /// Truncation happens on a character boundary, so multi-byte UTF-8
    /// characters are dropped whole.
    pub fn truncated(text: &str) -> (Self, TextFit) {
        let mut end = 0;
        for (idx, ch) in text.char_indices() {
            let next = idx + ch.len_utf8();
            if next > GAMERTAG_MAX_LEN {
                break;
            }
            end = next;
        }

        let kept = &text[..end];
        let fit = TextFit::from_counts(kept.chars().count(), text.chars().count());
        if let TextFit::Truncated { dropped, .. } = fit {
            tracing::debug!(
                gamertag = kept,
                dropped,
                "gamertag exceeds {} bytes, truncated",
                GAMERTAG_MAX_LEN
            );
        }
        (Self(kept.to_string()), fit)
    }

    /// Read a NUL-terminated gamertag field from guest memory.
    ///
    /// Reads stop at the first NUL or at the field width, whichever comes
    /// first; invalid UTF-8 is replaced rather than rejected.
    pub fn from_field(field: &[u8]) -> Self {
        let window = &field[..field.len().min(GAMERTAG_MAX_LEN)];
        let len = window.iter().position(|&b| b == 0).unwrap_or(window.len());
        let text = String::from_utf8_lossy(&window[..len]);
        Self::truncated(&text).0
    }

    /// Fixed 16-byte field image, NUL padded.
    pub fn to_field(&self) -> [u8; GAMERTAG_FIELD_SIZE] {
        let mut field = [0u8; GAMERTAG_FIELD_SIZE];
        let bytes = self.0.as_bytes();
        field[..bytes.len()].copy_from_slice(bytes);
        field
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Gamertag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Gamertag {
    fn from(s: String) -> Self {
        Self::truncated(&s).0
    }
}

impl From<&str> for Gamertag {
    fn from(s: &str) -> Self {
        Self::truncated(s).0
    }
}

impl From<Gamertag> for String {
    fn from(tag: Gamertag) -> String {
        tag.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_fifteen_characters() {
        let (tag, fit) = Gamertag::truncated("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(tag.as_str(), "ABCDEFGHIJKLMNO");
        assert_eq!(fit, TextFit::Truncated { kept: 15, dropped: 11 });
    }

    #[test]
    fn short_tags_fit_exactly() {
        let (tag, fit) = Gamertag::truncated("Foo");
        assert_eq!(tag.as_str(), "Foo");
        assert_eq!(fit, TextFit::Exact);

        let (tag, fit) = Gamertag::truncated("ABCDEFGHIJKLMNO");
        assert_eq!(tag.as_str().len(), 15);
        assert!(!fit.is_truncated());
    }

    #[test]
    fn multibyte_characters_are_not_split() {
        // 7 two-byte characters = 14 bytes, the 8th would overflow
        let (tag, fit) = Gamertag::truncated("ééééééééé");
        assert_eq!(tag.as_str(), "ééééééé");
        assert_eq!(fit, TextFit::Truncated { kept: 7, dropped: 2 });
    }

    #[test]
    fn field_is_nul_terminated() {
        let tag = Gamertag::from("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        let field = tag.to_field();
        assert_eq!(&field[..15], b"ABCDEFGHIJKLMNO");
        assert_eq!(field[15], 0);
    }

    #[test]
    fn from_field_stops_at_nul_and_width() {
        let mut field = [0u8; GAMERTAG_FIELD_SIZE];
        field[..3].copy_from_slice(b"Foo");
        field[4] = b'X';
        assert_eq!(Gamertag::from_field(&field).as_str(), "Foo");

        let unterminated = [b'A'; 32];
        assert_eq!(Gamertag::from_field(&unterminated).as_str().len(), 15);
    }

    #[test]
    fn deserializing_truncates_instead_of_failing() {
        let tag: Gamertag = serde_json::from_str("\"ABCDEFGHIJKLMNOPQRSTUVWXYZ\"").unwrap();
        assert_eq!(tag.as_str(), "ABCDEFGHIJKLMNO");
    }
}
