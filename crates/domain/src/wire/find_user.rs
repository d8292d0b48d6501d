//! User lookup structures: FIND_USER_INFO and the response header

use super::{WireReader, WireStruct, WireWriter};
use crate::ids::Xuid;
use crate::value_objects::{Gamertag, GAMERTAG_FIELD_SIZE};

/// One lookup entry: a XUID and/or gamertag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindUserInfo {
    pub xuid: Xuid,
    pub gamertag: Gamertag,
}

impl WireStruct for FindUserInfo {
    const SIZE: usize = 8 + GAMERTAG_FIELD_SIZE;
    const NAME: &'static str = "FIND_USER_INFO";

    fn write_fields(&self, w: &mut WireWriter<'_>) {
        w.put_u64(self.xuid.value());
        w.put_bytes(&self.gamertag.to_field());
    }

    fn read_fields(r: &mut WireReader<'_>) -> Self {
        let xuid = Xuid::new(r.u64());
        let field: [u8; GAMERTAG_FIELD_SIZE] = r.bytes();
        Self {
            xuid,
            gamertag: Gamertag::from_field(&field),
        }
    }
}

/// Header of a lookup response; points at the entry array in guest memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindUsersResponseHeader {
    pub results_count: u32,
    pub users_address: u32,
}

impl WireStruct for FindUsersResponseHeader {
    const SIZE: usize = 4 + 4;
    const NAME: &'static str = "FIND_USERS_RESPONSE";

    fn write_fields(&self, w: &mut WireWriter<'_>) {
        w.put_u32(self.results_count);
        w.put_u32(self.users_address);
    }

    fn read_fields(r: &mut WireReader<'_>) -> Self {
        Self {
            results_count: r.u32(),
            users_address: r.u32(),
        }
    }
}

/// A complete lookup response laid out as header followed by entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindUsersResponse {
    pub header: FindUsersResponseHeader,
    pub entries: Vec<FindUserInfo>,
}

impl FindUsersResponse {
    /// Build a response to be written at guest address `base_address`; the
    /// entry array immediately follows the header.
    pub fn at(base_address: u32, entries: Vec<FindUserInfo>) -> Self {
        Self {
            header: FindUsersResponseHeader {
                results_count: entries.len() as u32,
                users_address: base_address.wrapping_add(FindUsersResponseHeader::SIZE as u32),
            },
            entries,
        }
    }

    pub fn byte_len(&self) -> usize {
        FindUsersResponseHeader::SIZE + self.entries.len() * FindUserInfo::SIZE
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_len());
        buf.extend_from_slice(&self.header.to_bytes());
        for entry in &self.entries {
            buf.extend_from_slice(&entry.to_bytes());
        }
        buf
    }
}

const _: () = assert!(FindUserInfo::SIZE == 0x18);
const _: () = assert!(FindUsersResponseHeader::SIZE == 0x8);
