//! Rich presence text with its two length caps
//!
//! Rich presence is UTF-16 on the console. Records keep up to
//! [`RICH_PRESENCE_INTERNAL_CAP`] code units, which covers titles that write
//! past the wire limit; the fixed structures handed back to the guest carry at
//! most [`RICH_PRESENCE_WIRE_CAP`] units.
//!
//! Sizes are counted in UTF-16 code units. Truncation is by unit, so a
//! surrogate pair straddling a cap is split exactly as the console would.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TextFit;

/// Transmission cap, in UTF-16 code units
pub const RICH_PRESENCE_WIRE_CAP: usize = 64;

/// Internal storage cap, in UTF-16 code units
pub const RICH_PRESENCE_INTERNAL_CAP: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RichPresence {
    units: Vec<u16>,
}

impl RichPresence {
    /// Encode `text` as UTF-16, clamped to the internal cap.
    pub fn new(text: &str) -> (Self, TextFit) {
        let units: Vec<u16> = text.encode_utf16().collect();
        Self::from_units(&units)
    }

    /// Store raw UTF-16 units, clamped to the internal cap.
    pub fn from_units(units: &[u16]) -> (Self, TextFit) {
        let kept = units.len().min(RICH_PRESENCE_INTERNAL_CAP);
        let fit = TextFit::from_counts(kept, units.len());
        if fit.is_truncated() {
            tracing::debug!(
                actual = units.len(),
                cap = RICH_PRESENCE_INTERNAL_CAP,
                "rich presence exceeds internal cap, truncated"
            );
        }
        (
            Self {
                units: units[..kept].to_vec(),
            },
            fit,
        )
    }

    /// Stored size field: min(actual size, internal cap)
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Units that survive the transmission cap.
    pub fn wire_units(&self) -> (&[u16], TextFit) {
        let kept = self.units.len().min(RICH_PRESENCE_WIRE_CAP);
        (
            &self.units[..kept],
            TextFit::from_counts(kept, self.units.len()),
        )
    }

    /// Size field for the wire form: min(stored size, transmission cap)
    pub fn wire_len(&self) -> usize {
        self.units.len().min(RICH_PRESENCE_WIRE_CAP)
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

impl fmt::Display for RichPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl From<String> for RichPresence {
    fn from(s: String) -> Self {
        Self::new(&s).0
    }
}

impl From<RichPresence> for String {
    fn from(rp: RichPresence) -> String {
        rp.to_string_lossy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_internal_cap() {
        let text = "x".repeat(200);
        let (rp, fit) = RichPresence::new(&text);
        assert_eq!(rp.len(), RICH_PRESENCE_INTERNAL_CAP);
        assert_eq!(fit, TextFit::Truncated { kept: 100, dropped: 100 });
    }

    #[test]
    fn wire_form_clamps_to_transmission_cap() {
        let (rp, _) = RichPresence::new(&"x".repeat(200));
        let (units, fit) = rp.wire_units();
        assert_eq!(units.len(), RICH_PRESENCE_WIRE_CAP);
        assert_eq!(rp.wire_len(), RICH_PRESENCE_WIRE_CAP);
        assert!(fit.is_truncated());
    }

    #[test]
    fn size_is_lesser_of_actual_and_cap() {
        for actual in [0usize, 1, 63, 64, 65, 99, 100, 101, 150] {
            let (rp, _) = RichPresence::new(&"a".repeat(actual));
            assert_eq!(rp.len(), actual.min(RICH_PRESENCE_INTERNAL_CAP));
            assert_eq!(rp.wire_len(), actual.min(RICH_PRESENCE_WIRE_CAP));
        }
    }

    #[test]
    fn counts_utf16_units_not_bytes() {
        // U+1F600 is one char, two UTF-16 units, four UTF-8 bytes
        let (rp, fit) = RichPresence::new("Hi \u{1F600}");
        assert_eq!(rp.len(), 5);
        assert_eq!(fit, TextFit::Exact);
        assert_eq!(rp.to_string_lossy(), "Hi \u{1F600}");
    }

    #[test]
    fn short_text_fits_exactly() {
        let (rp, fit) = RichPresence::new("Hello");
        assert_eq!(rp.to_string(), "Hello");
        assert_eq!(fit, TextFit::Exact);
        let (_, wire_fit) = rp.wire_units();
        assert_eq!(wire_fit, TextFit::Exact);
    }
}
