//! Friends presence documents
//!
//! Request: `{"xuids":["<hex16>", ...]}`
//!
//! Response: `[{"xuid","gamertag","state","sessionId","titleId","stateChangeTime","richPresence"}, ...]`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xonline_domain::entities::{FriendRecord, PresenceRecord};
use xonline_domain::ids::{SessionId, TitleId, Xuid};
use xonline_domain::value_objects::{FileTime, PresenceState};
use xonline_domain::wire::XOnlineFriend;

use crate::error::BridgeError;
use crate::json_object::{hex_field, require_array, xuid_to_hex, JsonObject};

#[derive(Debug, Serialize)]
struct FriendsRequestDto {
    xuids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FriendPresenceDto {
    #[serde(default)]
    xuid: Option<Value>,
    #[serde(default)]
    gamertag: Option<String>,
    #[serde(default)]
    state: Option<u32>,
    #[serde(default)]
    session_id: Option<Value>,
    #[serde(default)]
    title_id: Option<Value>,
    #[serde(default)]
    state_change_time: Option<u64>,
    #[serde(default)]
    rich_presence: Option<String>,
}

impl FriendPresenceDto {
    fn into_presence(self, xuid: Xuid) -> PresenceRecord {
        let mut presence = PresenceRecord::new(xuid);
        if let Some(gamertag) = &self.gamertag {
            if presence.set_gamertag(gamertag).is_truncated() {
                tracing::warn!(%xuid, received = %gamertag, "backend gamertag exceeds field width, truncated");
            }
        }
        presence.restore_state(
            PresenceState::from_bits(self.state.unwrap_or_default()),
            FileTime::from_ticks(self.state_change_time.unwrap_or_default()),
        );
        presence.set_session(SessionId::from_raw(
            hex_field(self.session_id.as_ref()).unwrap_or_default(),
        ));
        let title = hex_field(self.title_id.as_ref())
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or_default();
        presence.set_title(TitleId::new(title));
        if let Some(text) = &self.rich_presence {
            if presence.set_rich_presence(text).is_truncated() {
                tracing::debug!(%xuid, "backend rich presence exceeds internal cap, truncated");
            }
        }
        presence
    }
}

/// Friends of the signed-in user, keyed by XUID, in first-seen order.
///
/// Refresh responses create or update records; [`FriendsCollection::clear`]
/// drops them all (dialog closed, sign-out).
#[derive(Debug, Clone, Default)]
pub struct FriendsCollection {
    friends: Vec<FriendRecord>,
}

impl FriendsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn friends(&self) -> &[FriendRecord] {
        &self.friends
    }

    pub fn get(&self, xuid: Xuid) -> Option<&FriendRecord> {
        self.friends.iter().find(|friend| friend.xuid() == xuid)
    }

    pub fn get_mut(&mut self, xuid: Xuid) -> Option<&mut FriendRecord> {
        self.friends.iter_mut().find(|friend| friend.xuid() == xuid)
    }

    /// Track `xuid` so the next refresh asks for it.
    pub fn add(&mut self, xuid: Xuid, gamertag: &str) -> &mut FriendRecord {
        if let Some(index) = self.position(xuid) {
            return &mut self.friends[index];
        }
        self.friends.push(FriendRecord::new(xuid, gamertag));
        let last = self.friends.len() - 1;
        &mut self.friends[last]
    }

    pub fn remove(&mut self, xuid: Xuid) -> Option<FriendRecord> {
        self.position(xuid).map(|index| self.friends.remove(index))
    }

    pub fn len(&self) -> usize {
        self.friends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }

    pub fn clear(&mut self) {
        self.friends.clear();
    }

    /// Merge a presence snapshot, creating the friend if unknown.
    pub fn upsert(&mut self, snapshot: PresenceRecord) {
        match self.position(snapshot.xuid()) {
            Some(index) => self.friends[index].update_presence(&snapshot),
            None => self.friends.push(FriendRecord::from_presence(snapshot)),
        }
    }

    pub fn to_wire_friends(&self) -> Vec<XOnlineFriend> {
        self.friends.iter().map(FriendRecord::to_wire_friend).collect()
    }

    fn position(&self, xuid: Xuid) -> Option<usize> {
        self.friends.iter().position(|friend| friend.xuid() == xuid)
    }
}

impl JsonObject for FriendsCollection {
    const KIND: &'static str = "friends presence";

    fn serialize(&self) -> Result<String, BridgeError> {
        let xuids = self
            .friends
            .iter()
            .map(|friend| xuid_to_hex(friend.xuid()))
            .collect();
        Ok(serde_json::to_string(&FriendsRequestDto { xuids })?)
    }

    /// Entries without a usable XUID are skipped; the rest are merged.
    fn from_json(&mut self, document: &Value) -> Result<(), BridgeError> {
        let items = require_array(Self::KIND, document)?;
        for (index, item) in items.iter().enumerate() {
            let dto = match FriendPresenceDto::deserialize(item) {
                Ok(dto) => dto,
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed friend presence entry");
                    continue;
                }
            };
            let Some(xuid) = hex_field(dto.xuid.as_ref()).map(Xuid::new) else {
                tracing::warn!(index, "skipping friend presence entry without a xuid");
                continue;
            };
            self.upsert(dto.into_presence(xuid));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_tracked_xuids() {
        let mut friends = FriendsCollection::new();
        friends.add(Xuid::new(1), "One");
        friends.add(Xuid::new(2), "Two");
        friends.add(Xuid::new(1), "Dup");
        assert_eq!(
            friends.serialize().unwrap(),
            r#"{"xuids":["0000000000000001","0000000000000002"]}"#
        );
    }

    #[test]
    fn refresh_creates_and_updates_records() {
        let mut friends = FriendsCollection::new();
        friends.add(Xuid::new(1), "Known");

        friends
            .from_json(&json!([
                {
                    "xuid": "0000000000000001",
                    "state": 3,
                    "sessionId": "AE00000000000009",
                    "titleId": "4D5307E6",
                    "stateChangeTime": 1000,
                    "richPresence": "In a match"
                },
                {"xuid": "0000000000000002", "gamertag": "Newcomer", "state": 1}
            ]))
            .unwrap();

        assert_eq!(friends.len(), 2);
        let known = friends.get(Xuid::new(1)).unwrap();
        assert_eq!(known.gamertag().as_str(), "Known");
        assert_eq!(known.presence().session_id().raw(), 0xAE00_0000_0000_0009);
        assert_eq!(known.presence().title_id(), TitleId::new(0x4D53_07E6));
        assert_eq!(known.rich_presence().to_string(), "In a match");
        assert!(known.presence().is_online());

        let newcomer = friends.get(Xuid::new(2)).unwrap();
        assert_eq!(newcomer.gamertag().as_str(), "Newcomer");
    }

    #[test]
    fn offline_entry_keeps_state_change_time() {
        let mut friends = FriendsCollection::new();
        friends
            .deserialize(r#"[{"xuid":"0000000000000007","state":0,"stateChangeTime":5000}]"#)
            .unwrap();
        let friend = friends.get(Xuid::new(7)).unwrap();
        assert!(!friend.presence().is_online());
        assert_eq!(friend.presence().state_change_time(), FileTime::from_ticks(5000));
        assert_eq!(
            friends.to_wire_friends()[0].user_time,
            FileTime::from_ticks(5000)
        );
    }

    #[test]
    fn refresh_keeps_received_invite_pending() {
        let mut friends = FriendsCollection::new();
        friends.add(Xuid::new(1), "Inviter");
        let session = SessionId::from_raw(0xAE00_0000_0000_0010);
        friends.get_mut(Xuid::new(1)).unwrap().receive_invite(
            Xuid::new(2),
            session,
            FileTime::from_ticks(1),
        );

        friends
            .deserialize(r#"[{"xuid":"0000000000000001","state":1}]"#)
            .unwrap();

        let friend = friends.get(Xuid::new(1)).unwrap();
        assert!(friend.has_pending_invite());
        assert_eq!(friend.invite_session_id(), session);
        assert!(friend.presence().is_online());
    }

    #[test]
    fn entries_without_xuid_are_skipped() {
        let mut friends = FriendsCollection::new();
        friends
            .from_json(&json!([{"gamertag": "Ghost"}, 17, {"xuid": "0000000000000004"}]))
            .unwrap();
        assert_eq!(friends.len(), 1);
        assert!(friends.get(Xuid::new(4)).is_some());
    }

    #[test]
    fn non_list_document_is_malformed() {
        let mut friends = FriendsCollection::new();
        let err = friends.deserialize(r#"{"friends":[]}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn clear_destroys_records() {
        let mut friends = FriendsCollection::new();
        friends.add(Xuid::new(1), "One");
        assert_eq!(friends.to_wire_friends().len(), 1);
        friends.clear();
        assert!(friends.is_empty());
        assert!(friends.remove(Xuid::new(1)).is_none());
    }
}
