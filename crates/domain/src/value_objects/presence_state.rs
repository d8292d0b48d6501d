//! Friend/presence state bits

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Coarse user state encoded in bits 16-19 of the state word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserState {
    Online,
    Away,
    Busy,
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresenceState(u32);

impl PresenceState {
    pub const NONE: PresenceState = PresenceState(0);
    pub const ONLINE: PresenceState = PresenceState(0x0000_0001);
    pub const PLAYING: PresenceState = PresenceState(0x0000_0002);
    pub const VOICE: PresenceState = PresenceState(0x0000_0008);
    pub const JOINABLE: PresenceState = PresenceState(0x0000_0010);

    pub const USER_STATE_MASK: u32 = 0x000F_0000;
    pub const USER_STATE_ONLINE: u32 = 0x0000_0000;
    pub const USER_STATE_AWAY: u32 = 0x0001_0000;
    pub const USER_STATE_BUSY: u32 = 0x0002_0000;

    pub const SENT_INVITE: PresenceState = PresenceState(0x0400_0000);
    pub const RECEIVED_INVITE: PresenceState = PresenceState(0x0800_0000);
    pub const INVITE_ACCEPTED: PresenceState = PresenceState(0x1000_0000);
    pub const INVITE_REJECTED: PresenceState = PresenceState(0x2000_0000);
    pub const SENT_REQUEST: PresenceState = PresenceState(0x4000_0000);
    pub const RECEIVED_REQUEST: PresenceState = PresenceState(0x8000_0000);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: PresenceState) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: PresenceState) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: PresenceState) {
        self.0 &= !other.0;
    }

    pub const fn is_online(self) -> bool {
        self.contains(Self::ONLINE)
    }

    pub fn user_state(self) -> UserState {
        match self.0 & Self::USER_STATE_MASK {
            Self::USER_STATE_ONLINE => UserState::Online,
            Self::USER_STATE_AWAY => UserState::Away,
            Self::USER_STATE_BUSY => UserState::Busy,
            other => UserState::Other(other),
        }
    }

    pub fn with_user_state(self, state: UserState) -> Self {
        let bits = match state {
            UserState::Online => Self::USER_STATE_ONLINE,
            UserState::Away => Self::USER_STATE_AWAY,
            UserState::Busy => Self::USER_STATE_BUSY,
            UserState::Other(bits) => bits & Self::USER_STATE_MASK,
        };
        Self((self.0 & !Self::USER_STATE_MASK) | bits)
    }
}

impl BitOr for PresenceState {
    type Output = PresenceState;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
