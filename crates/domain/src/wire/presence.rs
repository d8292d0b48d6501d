//! Presence structures: X_ONLINE_PRESENCE, X_ONLINE_FRIEND

use super::{WireReader, WireStruct, WireWriter};
use crate::ids::{SessionId, TitleId, Xuid};
use crate::value_objects::{FileTime, GAMERTAG_FIELD_SIZE, RICH_PRESENCE_WIRE_CAP};

fn put_file_time(w: &mut WireWriter<'_>, time: FileTime) {
    let (high, low) = time.to_parts();
    w.put_u32(high);
    w.put_u32(low);
}

fn get_file_time(r: &mut WireReader<'_>) -> FileTime {
    let high = r.u32();
    let low = r.u32();
    FileTime::from_parts(high, low)
}

fn put_rich_presence(w: &mut WireWriter<'_>, units: &[u16; RICH_PRESENCE_WIRE_CAP]) {
    for unit in units {
        w.put_u16(*unit);
    }
}

fn get_rich_presence(r: &mut WireReader<'_>) -> [u16; RICH_PRESENCE_WIRE_CAP] {
    let mut units = [0u16; RICH_PRESENCE_WIRE_CAP];
    for unit in units.iter_mut() {
        *unit = r.u16();
    }
    units
}

/// Pack up to the transmission cap of UTF-16 units into the fixed field.
pub(crate) fn rich_presence_field(units: &[u16]) -> [u16; RICH_PRESENCE_WIRE_CAP] {
    let mut field = [0u16; RICH_PRESENCE_WIRE_CAP];
    let len = units.len().min(RICH_PRESENCE_WIRE_CAP);
    field[..len].copy_from_slice(&units[..len]);
    field
}

/// Presence of one user as returned to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XOnlinePresence {
    pub xuid: Xuid,
    pub state: u32,
    pub session_id: SessionId,
    pub title_id: TitleId,
    pub state_change_time: FileTime,
    /// Rich presence length in UTF-16 code units
    pub rich_presence_len: u32,
    pub rich_presence: [u16; RICH_PRESENCE_WIRE_CAP],
}

impl XOnlinePresence {
    /// Units of the rich presence field that are in use
    pub fn rich_presence_units(&self) -> &[u16] {
        let len = (self.rich_presence_len as usize).min(RICH_PRESENCE_WIRE_CAP);
        &self.rich_presence[..len]
    }
}

impl WireStruct for XOnlinePresence {
    const SIZE: usize = 8 + 4 + 8 + 4 + 8 + 4 + 2 * RICH_PRESENCE_WIRE_CAP;
    const NAME: &'static str = "X_ONLINE_PRESENCE";

    fn write_fields(&self, w: &mut WireWriter<'_>) {
        w.put_u64(self.xuid.value());
        w.put_u32(self.state);
        w.put_bytes(&self.session_id.to_wire_bytes());
        w.put_u32(self.title_id.value());
        put_file_time(w, self.state_change_time);
        w.put_u32(self.rich_presence_len);
        put_rich_presence(w, &self.rich_presence);
    }

    fn read_fields(r: &mut WireReader<'_>) -> Self {
        Self {
            xuid: Xuid::new(r.u64()),
            state: r.u32(),
            session_id: SessionId::from_wire_bytes(r.bytes()),
            title_id: TitleId::new(r.u32()),
            state_change_time: get_file_time(r),
            rich_presence_len: r.u32(),
            rich_presence: get_rich_presence(r),
        }
    }
}

/// Friend list entry as returned to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XOnlineFriend {
    pub xuid: Xuid,
    pub gamertag: [u8; GAMERTAG_FIELD_SIZE],
    pub friend_state: u32,
    pub session_id: SessionId,
    pub title_id: TitleId,
    pub user_time: FileTime,
    pub invite_session_id: SessionId,
    pub invite_time: FileTime,
    /// Rich presence length in UTF-16 code units
    pub rich_presence_len: u32,
    pub rich_presence: [u16; RICH_PRESENCE_WIRE_CAP],
}

impl XOnlineFriend {
    pub fn rich_presence_units(&self) -> &[u16] {
        let len = (self.rich_presence_len as usize).min(RICH_PRESENCE_WIRE_CAP);
        &self.rich_presence[..len]
    }
}

impl WireStruct for XOnlineFriend {
    const SIZE: usize =
        8 + GAMERTAG_FIELD_SIZE + 4 + 8 + 4 + 8 + 8 + 8 + 4 + 2 * RICH_PRESENCE_WIRE_CAP;
    const NAME: &'static str = "X_ONLINE_FRIEND";

    fn write_fields(&self, w: &mut WireWriter<'_>) {
        w.put_u64(self.xuid.value());
        w.put_bytes(&self.gamertag);
        w.put_u32(self.friend_state);
        w.put_bytes(&self.session_id.to_wire_bytes());
        w.put_u32(self.title_id.value());
        put_file_time(w, self.user_time);
        w.put_bytes(&self.invite_session_id.to_wire_bytes());
        put_file_time(w, self.invite_time);
        w.put_u32(self.rich_presence_len);
        put_rich_presence(w, &self.rich_presence);
    }

    fn read_fields(r: &mut WireReader<'_>) -> Self {
        Self {
            xuid: Xuid::new(r.u64()),
            gamertag: r.bytes(),
            friend_state: r.u32(),
            session_id: SessionId::from_wire_bytes(r.bytes()),
            title_id: TitleId::new(r.u32()),
            user_time: get_file_time(r),
            invite_session_id: SessionId::from_wire_bytes(r.bytes()),
            invite_time: get_file_time(r),
            rich_presence_len: r.u32(),
            rich_presence: get_rich_presence(r),
        }
    }
}

const _: () = assert!(XOnlinePresence::SIZE == 0xA4);
const _: () = assert!(XOnlineFriend::SIZE == 0xC4);
