//! Outcome of copying text into a bounded field

/// Result of fitting text into a fixed-capacity field.
///
/// Oversized text is clamped rather than rejected, so mutators report the
/// clamp through this value instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "check whether the text was truncated"]
pub enum TextFit {
    /// The whole input was stored
    Exact,
    /// The input was clamped; `dropped` counts the units that did not fit
    Truncated { kept: usize, dropped: usize },
}

impl TextFit {
    pub fn is_truncated(&self) -> bool {
        matches!(self, TextFit::Truncated { .. })
    }

    pub(crate) fn from_counts(kept: usize, total: usize) -> Self {
        if kept >= total {
            TextFit::Exact
        } else {
            TextFit::Truncated {
                kept,
                dropped: total - kept,
            }
        }
    }
}
