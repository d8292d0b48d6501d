//! Presence collection document
//!
//! Encodes as `{"presence":[{"xuid":"<hex16>","richPresence":"<utf8>"}, ...]}`.
//! Only the XUID and rich presence text are sent, whatever else the records
//! hold. Decoding is not supported: presence fetched from the backend arrives
//! through [`FriendsCollection`](crate::FriendsCollection) instead.

use serde::Serialize;
use serde_json::Value;
use xonline_domain::entities::PresenceRecord;
use xonline_domain::ids::Xuid;

use crate::error::BridgeError;
use crate::json_object::{xuid_to_hex, JsonObject};

#[derive(Debug, Serialize)]
struct PresenceDocument {
    presence: Vec<PresenceEntryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresenceEntryDto {
    xuid: String,
    rich_presence: String,
}

/// Presence records to publish, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PresenceCollection {
    records: Vec<PresenceRecord>,
}

impl PresenceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PresenceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PresenceRecord] {
        &self.records
    }

    pub fn get(&self, xuid: Xuid) -> Option<&PresenceRecord> {
        self.records.iter().find(|record| record.xuid() == xuid)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl FromIterator<PresenceRecord> for PresenceCollection {
    fn from_iter<I: IntoIterator<Item = PresenceRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl JsonObject for PresenceCollection {
    const KIND: &'static str = "presence";

    fn serialize(&self) -> Result<String, BridgeError> {
        let presence = self
            .records
            .iter()
            .map(|record| PresenceEntryDto {
                xuid: xuid_to_hex(record.xuid()),
                rich_presence: record.rich_presence().to_string_lossy(),
            })
            .collect();
        Ok(serde_json::to_string(&PresenceDocument { presence })?)
    }

    /// Always fails; this collection is publish-only.
    fn from_json(&mut self, _document: &Value) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported(Self::KIND))
    }

    fn deserialize(&mut self, _text: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported(Self::KIND))
    }
}
