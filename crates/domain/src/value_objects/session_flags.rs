//! Session creation flags

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionFlags(u32);

impl SessionFlags {
    pub const NONE: SessionFlags = SessionFlags(0);
    pub const HOST: SessionFlags = SessionFlags(0x0001);
    pub const USES_PRESENCE: SessionFlags = SessionFlags(0x0002);
    pub const USES_STATS: SessionFlags = SessionFlags(0x0004);
    pub const USES_MATCHMAKING: SessionFlags = SessionFlags(0x0008);
    pub const USES_ARBITRATION: SessionFlags = SessionFlags(0x0010);
    pub const USES_PEER_NETWORK: SessionFlags = SessionFlags(0x0020);
    pub const SOCIAL_MATCHMAKING_ALLOWED: SessionFlags = SessionFlags(0x0080);
    pub const INVITES_DISABLED: SessionFlags = SessionFlags(0x0100);
    pub const JOIN_VIA_PRESENCE_DISABLED: SessionFlags = SessionFlags(0x0200);
    pub const JOIN_IN_PROGRESS_DISABLED: SessionFlags = SessionFlags(0x0400);
    pub const JOIN_VIA_PRESENCE_FRIENDS_ONLY: SessionFlags = SessionFlags(0x0800);

    /// Flags that may change after creation
    pub const MODIFIABLE_MASK: u32 = 0x0F80;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: SessionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: SessionFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: SessionFlags) {
        self.0 &= !other.0;
    }

    pub const fn is_host(self) -> bool {
        self.contains(Self::HOST)
    }

    /// Apply a modify request: only the modifiable bits are taken from `requested`.
    pub const fn modified(self, requested: SessionFlags) -> Self {
        Self((self.0 & !Self::MODIFIABLE_MASK) | (requested.0 & Self::MODIFIABLE_MASK))
    }
}

impl BitOr for SessionFlags {
    type Output = SessionFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_keeps_creation_only_bits() {
        let flags = SessionFlags::HOST | SessionFlags::USES_PRESENCE | SessionFlags::INVITES_DISABLED;
        let modified = flags.modified(SessionFlags::JOIN_IN_PROGRESS_DISABLED | SessionFlags::USES_STATS);
        assert!(modified.is_host());
        assert!(modified.contains(SessionFlags::USES_PRESENCE));
        assert!(!modified.contains(SessionFlags::USES_STATS));
        assert!(!modified.contains(SessionFlags::INVITES_DISABLED));
        assert!(modified.contains(SessionFlags::JOIN_IN_PROGRESS_DISABLED));
    }
}
