//! Session structures: XNADDR, XSESSION_INFO, XSESSION_LOCAL_DETAILS

use std::net::Ipv4Addr;

use super::{WireReader, WireStruct, WireWriter};
use crate::ids::SessionId;
use crate::value_objects::{ExchangeKey, HostAddress, MacAddress, EXCHANGE_KEY_SIZE};

impl WireStruct for HostAddress {
    // ina + ina_online + port + enet + online id
    const SIZE: usize = 4 + 4 + 2 + 6 + 20;
    const NAME: &'static str = "XNADDR";

    fn write_fields(&self, w: &mut WireWriter<'_>) {
        w.put_bytes(&self.ina.octets());
        w.put_bytes(&self.ina_online.octets());
        w.put_u16(self.port_online);
        w.put_bytes(&self.mac.octets());
        w.put_bytes(&self.online_id);
    }

    fn read_fields(r: &mut WireReader<'_>) -> Self {
        Self {
            ina: Ipv4Addr::from(r.bytes::<4>()),
            ina_online: Ipv4Addr::from(r.bytes::<4>()),
            port_online: r.u16(),
            mac: MacAddress::new(r.bytes()),
            online_id: r.bytes(),
        }
    }
}

/// Session connection info handed to joining consoles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XSessionInfo {
    pub host_address: HostAddress,
    pub session_id: SessionId,
    pub key_exchange_key: ExchangeKey,
}

impl WireStruct for XSessionInfo {
    const SIZE: usize = HostAddress::SIZE + 8 + EXCHANGE_KEY_SIZE;
    const NAME: &'static str = "XSESSION_INFO";

    fn write_fields(&self, w: &mut WireWriter<'_>) {
        w.put_struct(&self.host_address);
        w.put_bytes(&self.session_id.to_wire_bytes());
        w.put_bytes(self.key_exchange_key.as_bytes());
    }

    fn read_fields(r: &mut WireReader<'_>) -> Self {
        Self {
            host_address: r.get_struct(),
            session_id: SessionId::from_wire_bytes(r.bytes()),
            key_exchange_key: ExchangeKey::new(r.bytes()),
        }
    }
}

/// Local view of a session, returned by session detail queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XSessionLocalDetails {
    pub user_index_host: u32,
    pub game_type: u32,
    pub game_mode: u32,
    pub flags: u32,
    pub max_public_slots: u32,
    pub max_private_slots: u32,
    pub available_public_slots: u32,
    pub available_private_slots: u32,
    pub actual_member_count: u32,
    pub returned_member_count: u32,
    pub state: u32,
    pub nonce: u64,
    pub session_info: XSessionInfo,
    pub arbitration_id: SessionId,
    /// Guest pointer to the member array
    pub members_address: u32,
}

/// The nonce is 8-byte aligned, leaving a dword of padding after `state`.
const LOCAL_DETAILS_NONCE_PAD: usize = 4;

impl WireStruct for XSessionLocalDetails {
    const SIZE: usize = 11 * 4 + LOCAL_DETAILS_NONCE_PAD + 8 + XSessionInfo::SIZE + 8 + 4;
    const NAME: &'static str = "XSESSION_LOCAL_DETAILS";

    fn write_fields(&self, w: &mut WireWriter<'_>) {
        w.put_u32(self.user_index_host);
        w.put_u32(self.game_type);
        w.put_u32(self.game_mode);
        w.put_u32(self.flags);
        w.put_u32(self.max_public_slots);
        w.put_u32(self.max_private_slots);
        w.put_u32(self.available_public_slots);
        w.put_u32(self.available_private_slots);
        w.put_u32(self.actual_member_count);
        w.put_u32(self.returned_member_count);
        w.put_u32(self.state);
        w.skip(LOCAL_DETAILS_NONCE_PAD);
        w.put_u64(self.nonce);
        w.put_struct(&self.session_info);
        w.put_bytes(&self.arbitration_id.to_wire_bytes());
        w.put_u32(self.members_address);
    }

    fn read_fields(r: &mut WireReader<'_>) -> Self {
        let user_index_host = r.u32();
        let game_type = r.u32();
        let game_mode = r.u32();
        let flags = r.u32();
        let max_public_slots = r.u32();
        let max_private_slots = r.u32();
        let available_public_slots = r.u32();
        let available_private_slots = r.u32();
        let actual_member_count = r.u32();
        let returned_member_count = r.u32();
        let state = r.u32();
        r.skip(LOCAL_DETAILS_NONCE_PAD);
        Self {
            user_index_host,
            game_type,
            game_mode,
            flags,
            max_public_slots,
            max_private_slots,
            available_public_slots,
            available_private_slots,
            actual_member_count,
            returned_member_count,
            state,
            nonce: r.u64(),
            session_info: r.get_struct(),
            arbitration_id: SessionId::from_wire_bytes(r.bytes()),
            members_address: r.u32(),
        }
    }
}

const _: () = assert!(HostAddress::SIZE == 0x24);
const _: () = assert!(XSessionInfo::SIZE == 0x3C);
const _: () = assert!(XSessionLocalDetails::SIZE == 0x80);
