//! Friend record - presence plus game invite metadata

use crate::ids::{SessionId, Xuid};
use crate::value_objects::{FileTime, Gamertag, PresenceState, RichPresence, TextFit};
use crate::wire::rich_presence_field;
use crate::wire::XOnlineFriend;

use super::presence::PresenceRecord;

/// State bits owned by the invite flow rather than by presence snapshots.
const INVITE_FLAGS: [PresenceState; 4] = [
    PresenceState::SENT_INVITE,
    PresenceState::RECEIVED_INVITE,
    PresenceState::INVITE_ACCEPTED,
    PresenceState::INVITE_REJECTED,
];

/// `base` with its invite bits replaced by those set in `invite`.
fn with_invite_bits(base: PresenceState, invite: PresenceState) -> PresenceState {
    let mut state = base;
    for flag in INVITE_FLAGS {
        state.remove(flag);
        if invite.contains(flag) {
            state.insert(flag);
        }
    }
    state
}

/// A friend of the signed-in user.
///
/// Created or updated whenever a friends-list refresh or presence
/// subscription response arrives; owned by whichever cache holds it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FriendRecord {
    presence: PresenceRecord,
    inviter: Option<Xuid>,
    invitee: Option<Xuid>,
    invite_session_id: SessionId,
    invite_time: FileTime,
}

impl FriendRecord {
    pub fn new(xuid: Xuid, gamertag: &str) -> Self {
        let mut presence = PresenceRecord::new(xuid);
        let _ = presence.set_gamertag(gamertag);
        Self {
            presence,
            ..Self::default()
        }
    }

    pub fn from_presence(presence: PresenceRecord) -> Self {
        Self {
            presence,
            ..Self::default()
        }
    }

    pub fn xuid(&self) -> Xuid {
        self.presence.xuid()
    }

    pub fn gamertag(&self) -> &Gamertag {
        self.presence.gamertag()
    }

    pub fn presence(&self) -> &PresenceRecord {
        &self.presence
    }

    pub fn presence_mut(&mut self) -> &mut PresenceRecord {
        &mut self.presence
    }

    pub fn set_gamertag(&mut self, text: &str) -> TextFit {
        self.presence.set_gamertag(text)
    }

    pub fn set_rich_presence(&mut self, text: &str) -> TextFit {
        self.presence.set_rich_presence(text)
    }

    /// Take a fresh presence snapshot, keeping the gamertag if the snapshot
    /// has none and leaving invite metadata intact.
    pub fn update_presence(&mut self, snapshot: &PresenceRecord) {
        let gamertag = if snapshot.gamertag().is_empty() {
            self.presence.gamertag().clone()
        } else {
            snapshot.gamertag().clone()
        };
        let state = with_invite_bits(snapshot.state(), self.presence.state());
        self.presence = snapshot.clone();
        self.presence.restore_state(state, snapshot.state_change_time());
        let _ = self.presence.set_gamertag(gamertag.as_str());
    }

    pub fn inviter(&self) -> Option<Xuid> {
        self.inviter
    }

    pub fn invitee(&self) -> Option<Xuid> {
        self.invitee
    }

    pub fn invite_session_id(&self) -> SessionId {
        self.invite_session_id
    }

    pub fn invite_time(&self) -> FileTime {
        self.invite_time
    }

    /// This friend invited `invitee` into `session_id`.
    pub fn receive_invite(&mut self, invitee: Xuid, session_id: SessionId, at: FileTime) {
        let inviter = self.xuid();
        self.set_invite(inviter, invitee, session_id, at);
        self.invite_state_bits(PresenceState::RECEIVED_INVITE);
    }

    /// `inviter` invited this friend into `session_id`.
    pub fn send_invite(&mut self, inviter: Xuid, session_id: SessionId, at: FileTime) {
        let invitee = self.xuid();
        self.set_invite(inviter, invitee, session_id, at);
        self.invite_state_bits(PresenceState::SENT_INVITE);
    }

    pub fn accept_invite(&mut self) {
        self.invite_state_bits(PresenceState::INVITE_ACCEPTED);
    }

    pub fn decline_invite(&mut self) {
        self.invite_state_bits(PresenceState::INVITE_REJECTED);
    }

    pub fn clear_invite(&mut self) {
        self.inviter = None;
        self.invitee = None;
        self.invite_session_id = SessionId::NONE;
        self.invite_time = FileTime::ZERO;
        self.invite_state_bits(PresenceState::NONE);
    }

    pub fn has_pending_invite(&self) -> bool {
        self.presence
            .state()
            .contains(PresenceState::RECEIVED_INVITE)
    }

    fn set_invite(&mut self, inviter: Xuid, invitee: Xuid, session_id: SessionId, at: FileTime) {
        self.inviter = Some(inviter);
        self.invitee = Some(invitee);
        self.invite_session_id = session_id;
        self.invite_time = at;
    }

    /// Replace the invite bits of the state word, keeping the time stamp.
    fn invite_state_bits(&mut self, bits: PresenceState) {
        let state = with_invite_bits(self.presence.state(), bits);
        let at = self.presence.state_change_time();
        self.presence.set_state(state, at);
    }

    /// Fixed-layout friend image; rich presence clamped to the wire cap.
    pub fn to_wire_friend(&self) -> XOnlineFriend {
        let (units, fit) = self.presence.rich_presence().wire_units();
        if fit.is_truncated() {
            tracing::debug!(xuid = %self.xuid(), "rich presence clamped to transmission cap");
        }
        XOnlineFriend {
            xuid: self.xuid(),
            gamertag: self.presence.gamertag().to_field(),
            friend_state: self.presence.state().bits(),
            session_id: self.presence.session_id(),
            title_id: self.presence.title_id(),
            user_time: self.presence.state_change_time(),
            invite_session_id: self.invite_session_id,
            invite_time: self.invite_time,
            rich_presence_len: units.len() as u32,
            rich_presence: rich_presence_field(units),
        }
    }

    pub fn from_wire_friend(wire: &XOnlineFriend) -> Self {
        let mut presence = PresenceRecord::new(wire.xuid);
        let _ = presence.set_gamertag(Gamertag::from_field(&wire.gamertag).as_str());
        presence.restore_state(PresenceState::from_bits(wire.friend_state), wire.user_time);
        presence.set_session(wire.session_id);
        presence.set_title(wire.title_id);
        let _ = presence.set_rich_presence_units(wire.rich_presence_units());
        Self {
            presence,
            inviter: None,
            invitee: None,
            invite_session_id: wire.invite_session_id,
            invite_time: wire.invite_time,
        }
    }

    pub fn rich_presence(&self) -> &RichPresence {
        self.presence.rich_presence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TitleId;
    use crate::value_objects::RICH_PRESENCE_WIRE_CAP;
    use crate::wire::WireStruct;

    #[test]
    fn wire_friend_is_friend_sized() {
        let mut friend = FriendRecord::new(Xuid::new(1), "Foo");
        let _ = friend.set_rich_presence(&"z".repeat(150));
        let wire = friend.to_wire_friend();
        assert_eq!(wire.to_bytes().len(), 0xC4);
        assert_eq!(wire.rich_presence_len as usize, RICH_PRESENCE_WIRE_CAP);
        assert_eq!(&wire.gamertag[..4], b"Foo\0");
    }

    #[test]
    fn invite_flow_sets_and_clears_bits() {
        let me = Xuid::new(0x0009_0000_0000_0002);
        let mut friend = FriendRecord::new(Xuid::new(0x0009_0000_0000_0001), "Inviter");
        let session = SessionId::from_raw(0xAE00_0000_0000_0010);

        friend.receive_invite(me, session, FileTime::from_ticks(1234));
        assert!(friend.has_pending_invite());
        assert_eq!(friend.inviter(), Some(friend.xuid()));
        assert_eq!(friend.invitee(), Some(me));
        assert_eq!(friend.to_wire_friend().invite_session_id, session);

        friend.accept_invite();
        assert!(!friend.has_pending_invite());
        assert!(friend
            .presence()
            .state()
            .contains(PresenceState::INVITE_ACCEPTED));

        friend.clear_invite();
        assert_eq!(friend.invite_session_id(), SessionId::NONE);
        assert_eq!(friend.presence().state(), PresenceState::NONE);
    }

    #[test]
    fn update_presence_keeps_known_gamertag_and_invite() {
        let mut friend = FriendRecord::new(Xuid::new(7), "Known");
        friend.send_invite(Xuid::new(8), SessionId::from_raw(0xAE00_0000_0000_0001), FileTime::ZERO);

        let mut snapshot = PresenceRecord::new(Xuid::new(7));
        snapshot.set_title(TitleId::new(0x4D53_07E6));
        friend.update_presence(&snapshot);

        assert_eq!(friend.gamertag().as_str(), "Known");
        assert_eq!(friend.presence().title_id(), TitleId::new(0x4D53_07E6));
        assert_eq!(friend.inviter(), Some(Xuid::new(8)));
    }

    #[test]
    fn wire_round_trip_preserves_presence_fields() {
        let mut friend = FriendRecord::new(Xuid::new(3), "Roundtrip");
        friend
            .presence_mut()
            .set_state(PresenceState::ONLINE, FileTime::from_ticks(77));
        let _ = friend.set_rich_presence("Menus");
        let decoded = FriendRecord::from_wire_friend(&friend.to_wire_friend());
        assert_eq!(decoded.presence(), friend.presence());
    }

    #[test]
    fn offline_friend_keeps_user_time_through_wire() {
        let wire = XOnlineFriend {
            xuid: Xuid::new(4),
            friend_state: 0,
            user_time: FileTime::from_ticks(77),
            ..FriendRecord::new(Xuid::new(4), "Offline").to_wire_friend()
        };
        let decoded = FriendRecord::from_wire_friend(&wire);
        assert_eq!(decoded.presence().state(), PresenceState::NONE);
        assert_eq!(decoded.presence().state_change_time(), FileTime::from_ticks(77));
        assert_eq!(decoded.to_wire_friend().user_time, FileTime::from_ticks(77));
    }

    #[test]
    fn refresh_after_invite_keeps_it_pending() {
        let mut friend = FriendRecord::new(Xuid::new(1), "Inviter");
        let session = SessionId::from_raw(0xAE00_0000_0000_0010);
        friend.receive_invite(Xuid::new(2), session, FileTime::from_ticks(10));

        let mut snapshot = PresenceRecord::new(Xuid::new(1));
        snapshot.set_state(PresenceState::ONLINE, FileTime::from_ticks(20));
        friend.update_presence(&snapshot);

        assert!(friend.has_pending_invite());
        assert_eq!(friend.invite_session_id(), session);
        assert!(friend.presence().state().contains(PresenceState::ONLINE));
        assert_eq!(friend.presence().state_change_time(), FileTime::from_ticks(20));
    }
}
