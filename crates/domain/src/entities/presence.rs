//! Presence record - one user's online state as seen by the console

use crate::ids::{SessionId, TitleId, Xuid};
use crate::value_objects::{FileTime, Gamertag, PresenceState, RichPresence, TextFit};
use crate::wire::rich_presence_field;
use crate::wire::XOnlinePresence;

/// Presence of a single user.
///
/// # Invariants
///
/// - `gamertag` fits the 16-byte console field
/// - `rich_presence` holds at most 100 UTF-16 units; wire forms carry at most 64
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceRecord {
    xuid: Xuid,
    gamertag: Gamertag,
    state: PresenceState,
    session_id: SessionId,
    title_id: TitleId,
    state_change_time: FileTime,
    rich_presence: RichPresence,
}

impl PresenceRecord {
    pub fn new(xuid: Xuid) -> Self {
        Self {
            xuid,
            ..Self::default()
        }
    }

    pub fn xuid(&self) -> Xuid {
        self.xuid
    }

    pub fn gamertag(&self) -> &Gamertag {
        &self.gamertag
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Session the user is in; [`SessionId::NONE`] when not in one
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn title_id(&self) -> TitleId {
        self.title_id
    }

    pub fn state_change_time(&self) -> FileTime {
        self.state_change_time
    }

    pub fn rich_presence(&self) -> &RichPresence {
        &self.rich_presence
    }

    /// Copy up to 15 characters; anything longer is dropped without error.
    pub fn set_gamertag(&mut self, text: &str) -> TextFit {
        let (gamertag, fit) = Gamertag::truncated(text);
        self.gamertag = gamertag;
        fit
    }

    /// Store rich presence, clamped to the internal cap.
    pub fn set_rich_presence(&mut self, text: &str) -> TextFit {
        let (rich_presence, fit) = RichPresence::new(text);
        self.rich_presence = rich_presence;
        fit
    }

    /// Store rich presence from raw UTF-16 units (as written by a title).
    pub fn set_rich_presence_units(&mut self, units: &[u16]) -> TextFit {
        let (rich_presence, fit) = RichPresence::from_units(units);
        self.rich_presence = rich_presence;
        fit
    }

    /// Update the state word, stamping the change time.
    pub fn set_state(&mut self, state: PresenceState, at: FileTime) {
        if self.state != state {
            self.state = state;
            self.state_change_time = at;
        }
    }

    /// Store a state word and change time as reported elsewhere, even when the
    /// state matches the current one.
    pub fn restore_state(&mut self, state: PresenceState, at: FileTime) {
        self.state = state;
        self.state_change_time = at;
    }

    pub fn set_session(&mut self, session_id: SessionId) {
        self.session_id = session_id;
    }

    pub fn set_title(&mut self, title_id: TitleId) {
        self.title_id = title_id;
    }

    pub fn is_online(&self) -> bool {
        self.state.is_online()
    }

    /// Fixed-layout presence image; rich presence clamped to the wire cap.
    pub fn to_wire_presence(&self) -> XOnlinePresence {
        let (units, fit) = self.rich_presence.wire_units();
        if fit.is_truncated() {
            tracing::debug!(xuid = %self.xuid, "rich presence clamped to transmission cap");
        }
        XOnlinePresence {
            xuid: self.xuid,
            state: self.state.bits(),
            session_id: self.session_id,
            title_id: self.title_id,
            state_change_time: self.state_change_time,
            rich_presence_len: units.len() as u32,
            rich_presence: rich_presence_field(units),
        }
    }

    pub fn from_wire_presence(wire: &XOnlinePresence) -> Self {
        let (rich_presence, _) = RichPresence::from_units(wire.rich_presence_units());
        Self {
            xuid: wire.xuid,
            gamertag: Gamertag::default(),
            state: PresenceState::from_bits(wire.state),
            session_id: wire.session_id,
            title_id: wire.title_id,
            state_change_time: wire.state_change_time,
            rich_presence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{RICH_PRESENCE_INTERNAL_CAP, RICH_PRESENCE_WIRE_CAP};
    use crate::wire::WireStruct;

    #[test]
    fn restore_state_stores_time_for_unchanged_state() {
        let mut record = PresenceRecord::new(Xuid::new(1));
        record.set_state(PresenceState::NONE, FileTime::from_ticks(9));
        assert_eq!(record.state_change_time(), FileTime::ZERO);

        record.restore_state(PresenceState::NONE, FileTime::from_ticks(9));
        assert_eq!(record.state_change_time(), FileTime::from_ticks(9));
    }

    #[test]
    fn set_gamertag_truncates_silently() {
        let mut record = PresenceRecord::new(Xuid::new(1));
        let fit = record.set_gamertag("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(record.gamertag().as_str(), "ABCDEFGHIJKLMNO");
        assert!(fit.is_truncated());
    }

    #[test]
    fn rich_presence_caps_apply_in_order() {
        let mut record = PresenceRecord::new(Xuid::new(1));
        let fit = record.set_rich_presence(&"r".repeat(200));
        assert!(fit.is_truncated());
        assert_eq!(record.rich_presence().len(), RICH_PRESENCE_INTERNAL_CAP);

        let wire = record.to_wire_presence();
        assert_eq!(wire.rich_presence_len as usize, RICH_PRESENCE_WIRE_CAP);
        assert_eq!(wire.rich_presence_units().len(), RICH_PRESENCE_WIRE_CAP);
    }

    #[test]
    fn short_rich_presence_keeps_actual_size() {
        let mut record = PresenceRecord::new(Xuid::new(1));
        let _ = record.set_rich_presence("Hello");
        let wire = record.to_wire_presence();
        assert_eq!(wire.rich_presence_len, 5);
        assert_eq!(wire.rich_presence[5], 0);
    }

    #[test]
    fn state_change_time_only_moves_on_change() {
        let mut record = PresenceRecord::new(Xuid::new(1));
        record.set_state(PresenceState::ONLINE, FileTime::from_ticks(10));
        record.set_state(PresenceState::ONLINE, FileTime::from_ticks(20));
        assert_eq!(record.state_change_time(), FileTime::from_ticks(10));
        assert!(record.is_online());
    }

    #[test]
    fn wire_image_is_presence_sized_and_reversible() {
        let mut record = PresenceRecord::new(Xuid::new(0x0009_0000_0000_0001));
        record.set_state(PresenceState::ONLINE | PresenceState::PLAYING, FileTime::from_ticks(99));
        record.set_session(SessionId::from_raw(0xAE00_0000_0000_0042));
        record.set_title(TitleId::new(0x4D53_07E6));
        let _ = record.set_rich_presence("Playing Halo");

        let bytes = record.to_wire_presence().to_bytes();
        assert_eq!(bytes.len(), 0xA4);

        let decoded = XOnlinePresence::read_from(&bytes).unwrap();
        assert_eq!(PresenceRecord::from_wire_presence(&decoded), record);
    }
}
