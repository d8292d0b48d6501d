//! Unified error types for the domain layer
//!
//! Provides a common error type for identifier, lifecycle, and slot-count
//! failures so callers never have to fall back to strings or panics.

use thiserror::Error;

use crate::entities::session::{SessionState, SlotCategory};

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Session identifier is zero or carries an unrecognized tag byte
    #[error("Invalid session identifier: {0:016X}")]
    InvalidIdentifier(u64),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Session lifecycle transition outside the allowed graph
    #[error("Invalid session transition: {from} -> {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    /// Slot counts would violate `open + filled <= max`
    #[error("{category} slots over capacity: {open} open + {filled} filled > {max} max")]
    Capacity {
        category: SlotCategory,
        open: u32,
        filled: u32,
        max: u32,
    },
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format:
    /// - Non-hex identifier text
    /// - Unknown network mode names
    ///
    /// # Example
    /// ```ignore
    /// u64::from_str_radix(s, 16)
    ///     .map_err(|e| DomainError::parse(format!("Invalid XUID '{}': {}", s, e)))?;
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid transition error
    pub fn invalid_transition(from: SessionState, to: SessionState) -> Self {
        Self::InvalidTransition { from, to }
    }

    /// Create a capacity error
    pub fn capacity(category: SlotCategory, open: u32, filled: u32, max: u32) -> Self {
        Self::Capacity {
            category,
            open,
            filled,
            max,
        }
    }
}
