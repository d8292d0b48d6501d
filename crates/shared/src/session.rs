//! Session documents
//!
//! `{"sessionId","flags","hostAddress","macAddress","port","publicSlotsCount",
//! "privateSlotsCount","openPublicSlotsCount","openPrivateSlotsCount",
//! "filledPublicSlotsCount","filledPrivateSlotsCount"}`

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xonline_domain::entities::{SessionRecord, SlotCategory};
use xonline_domain::ids::SessionId;
use xonline_domain::value_objects::{HostAddress, MacAddress, SessionFlags};

use crate::error::BridgeError;
use crate::json_object::{hex_field, session_id_to_hex, JsonObject};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    session_id: String,
    flags: u32,
    host_address: String,
    mac_address: String,
    port: u16,
    public_slots_count: u32,
    private_slots_count: u32,
    open_public_slots_count: u32,
    open_private_slots_count: u32,
    filled_public_slots_count: u32,
    filled_private_slots_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDocumentDto {
    session_id: Value,
    #[serde(default)]
    flags: u32,
    #[serde(default)]
    host_address: Option<String>,
    #[serde(default)]
    mac_address: Option<String>,
    #[serde(default)]
    port: u16,
    #[serde(default)]
    public_slots_count: u32,
    #[serde(default)]
    private_slots_count: u32,
    #[serde(default)]
    open_public_slots_count: u32,
    #[serde(default)]
    open_private_slots_count: u32,
    #[serde(default)]
    filled_public_slots_count: u32,
    #[serde(default)]
    filled_private_slots_count: u32,
}

/// A session record as the backend lists it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionObject {
    record: SessionRecord,
}

impl SessionObject {
    pub fn new(record: SessionRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn into_record(self) -> SessionRecord {
        self.record
    }
}

impl Default for SessionObject {
    fn default() -> Self {
        Self::new(SessionRecord::new(SessionId::NONE, SessionFlags::NONE, 0, 0))
    }
}

fn decode_record(dto: SessionDocumentDto) -> Result<SessionRecord, BridgeError> {
    let raw = hex_field(Some(&dto.session_id))
        .ok_or_else(|| BridgeError::malformed("sessionId is not a hex string"))?;
    let id = SessionId::try_new(raw)?;

    let ina = match dto.host_address.as_deref() {
        Some(text) if !text.is_empty() => text
            .parse::<Ipv4Addr>()
            .map_err(|e| BridgeError::malformed(format!("hostAddress '{}': {}", text, e)))?,
        _ => Ipv4Addr::UNSPECIFIED,
    };
    let mac = match dto.mac_address.as_deref() {
        Some(text) if !text.is_empty() => text
            .parse::<MacAddress>()
            .map_err(|e| BridgeError::malformed(format!("macAddress '{}': {}", text, e)))?,
        _ => MacAddress::default(),
    };

    let mut record = SessionRecord::new(
        id,
        SessionFlags::from_bits(dto.flags),
        dto.public_slots_count,
        dto.private_slots_count,
    )
    .with_host_address(HostAddress::new(ina, dto.port, mac));
    record.set_slot_counts(
        SlotCategory::Public,
        dto.open_public_slots_count,
        dto.filled_public_slots_count,
    )?;
    record.set_slot_counts(
        SlotCategory::Private,
        dto.open_private_slots_count,
        dto.filled_private_slots_count,
    )?;
    Ok(record)
}

impl JsonObject for SessionObject {
    const KIND: &'static str = "session";

    fn serialize(&self) -> Result<String, BridgeError> {
        let record = &self.record;
        let public = record.slots(SlotCategory::Public);
        let private = record.slots(SlotCategory::Private);
        let host = record.host_address();
        let dto = SessionDto {
            session_id: session_id_to_hex(record.id()),
            flags: record.flags().bits(),
            host_address: host.ina_online.to_string(),
            mac_address: host.mac.to_string(),
            port: host.port_online,
            public_slots_count: public.max(),
            private_slots_count: private.max(),
            open_public_slots_count: public.open(),
            open_private_slots_count: private.open(),
            filled_public_slots_count: public.filled(),
            filled_private_slots_count: private.filled(),
        };
        Ok(serde_json::to_string(&dto)?)
    }

    /// Replaces the held record. Slot counts go through the capacity check,
    /// so an inconsistent document leaves the object untouched.
    fn from_json(&mut self, document: &Value) -> Result<(), BridgeError> {
        if !document.is_object() {
            tracing::warn!("expected a JSON object for the session document");
            return Err(BridgeError::malformed("session document is not an object"));
        }
        let dto = SessionDocumentDto::deserialize(document).map_err(|e| {
            tracing::warn!(error = %e, "backend session document has the wrong shape");
            BridgeError::malformed(e.to_string())
        })?;
        self.record = decode_record(dto)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xonline_domain::DomainError;

    fn sample() -> SessionRecord {
        let mac: MacAddress = "00:11:22:aa:bb:cc".parse().unwrap();
        let mut record = SessionRecord::new(
            SessionId::from_raw(0xAE00_0000_0000_0042),
            SessionFlags::HOST | SessionFlags::USES_PRESENCE,
            4,
            2,
        )
        .with_host_address(HostAddress::new(Ipv4Addr::new(10, 0, 0, 7), 3074, mac));
        record.fill_slots(SlotCategory::Public, 1).unwrap();
        record
    }

    #[test]
    fn serializes_fields_in_document_order() {
        let text = SessionObject::new(sample()).serialize().unwrap();
        assert_eq!(
            text,
            concat!(
                r#"{"sessionId":"AE00000000000042","flags":3,"hostAddress":"10.0.0.7","#,
                r#""macAddress":"001122aabbcc","port":3074,"publicSlotsCount":4,"#,
                r#""privateSlotsCount":2,"openPublicSlotsCount":3,"openPrivateSlotsCount":2,"#,
                r#""filledPublicSlotsCount":1,"filledPrivateSlotsCount":0}"#
            )
        );
    }

    #[test]
    fn decodes_backend_listing() {
        let mut object = SessionObject::default();
        object
            .deserialize(&SessionObject::new(sample()).serialize().unwrap())
            .unwrap();

        let record = object.record();
        assert_eq!(record.id().raw(), 0xAE00_0000_0000_0042);
        assert!(record.flags().is_host());
        assert_eq!(record.host_address().port_online, 3074);
        assert_eq!(record.slots(SlotCategory::Public).open(), 3);
        assert_eq!(record.slots(SlotCategory::Public).filled(), 1);
        assert_eq!(record.slots(SlotCategory::Private).max(), 2);
    }

    #[test]
    fn over_capacity_counts_are_rejected() {
        let mut object = SessionObject::new(sample());
        let err = object
            .from_json(&json!({
                "sessionId": "AE00000000000001",
                "publicSlotsCount": 2,
                "openPublicSlotsCount": 2,
                "filledPublicSlotsCount": 1
            }))
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Domain(DomainError::Capacity { open: 2, filled: 1, max: 2, .. })
        ));
        assert_eq!(object.record().id().raw(), 0xAE00_0000_0000_0042);
    }

    #[test]
    fn zero_session_id_is_rejected() {
        let mut object = SessionObject::default();
        let err = object
            .from_json(&json!({"sessionId": "0000000000000000"}))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Domain(DomainError::InvalidIdentifier(0))));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let mut object = SessionObject::default();
        assert!(object.from_json(&json!([1, 2])).unwrap_err().is_malformed());
        assert!(object
            .from_json(&json!({"sessionId": "AE00000000000001", "hostAddress": "nowhere"}))
            .unwrap_err()
            .is_malformed());
    }

    #[test]
    fn bad_mac_address_is_malformed() {
        let mut object = SessionObject::new(sample());
        let err = object
            .from_json(&json!({"sessionId": "AE00000000000001", "macAddress": "zz"}))
            .unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(object.record().id().raw(), 0xAE00_0000_0000_0042);
    }
}
