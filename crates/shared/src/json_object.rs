//! Common marshalling interface for backend JSON documents

use serde_json::Value;
use xonline_domain::ids::{parse_hex_u64, SessionId, Xuid};

use crate::error::BridgeError;

/// An object that can be encoded to and decoded from a backend document.
///
/// Each object kind implements this directly; callers pick the concrete type
/// statically.
pub trait JsonObject {
    /// Name used in diagnostics
    const KIND: &'static str;

    /// Encode as compact JSON text, fields in document order.
    fn serialize(&self) -> Result<String, BridgeError>;

    /// Decode from an already-parsed document.
    fn from_json(&mut self, document: &Value) -> Result<(), BridgeError>;

    /// Parse `text` and decode it; unparsable text is malformed input.
    fn deserialize(&mut self, text: &str) -> Result<(), BridgeError> {
        let document: Value = serde_json::from_str(text).map_err(|e| {
            tracing::warn!(kind = Self::KIND, error = %e, "backend sent unparsable JSON");
            BridgeError::malformed(e.to_string())
        })?;
        self.from_json(&document)
    }
}

/// 16 uppercase hex digits, most significant first.
pub fn xuid_to_hex(xuid: Xuid) -> String {
    xuid.to_string()
}

pub fn session_id_to_hex(id: SessionId) -> String {
    id.to_string()
}

/// Read a hex-string field as a 64-bit value. Numbers are accepted as-is.
pub(crate) fn hex_field(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::String(text) => parse_hex_u64(text).ok(),
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}

pub(crate) fn require_array<'a>(kind: &str, document: &'a Value) -> Result<&'a Vec<Value>, BridgeError> {
    document.as_array().ok_or_else(|| {
        tracing::warn!(kind, "expected a JSON list from the backend");
        BridgeError::malformed(format!("{} document is not a list", kind))
    })
}
