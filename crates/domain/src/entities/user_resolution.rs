//! XUID <-> gamertag lookup request and response
//!
//! Entries are positional: duplicates are kept and order is preserved, so
//! the n-th response entry answers the n-th request entry.

use crate::ids::Xuid;
use crate::value_objects::{Gamertag, TextFit};
use crate::wire::{FindUserInfo, FindUsersResponse};

/// One lookup pair; either side may be unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserResolutionEntry {
    pub xuid: Option<Xuid>,
    pub gamertag: Option<Gamertag>,
}

impl UserResolutionEntry {
    pub fn by_xuid(xuid: Xuid) -> Self {
        Self {
            xuid: Some(xuid),
            gamertag: None,
        }
    }

    /// Lookup by gamertag; oversized text is clamped to the field width.
    pub fn by_gamertag(text: &str) -> (Self, TextFit) {
        let (gamertag, fit) = Gamertag::truncated(text);
        (
            Self {
                xuid: None,
                gamertag: Some(gamertag),
            },
            fit,
        )
    }

    pub fn resolved(xuid: Xuid, gamertag: Gamertag) -> Self {
        Self {
            xuid: Some(xuid),
            gamertag: Some(gamertag),
        }
    }

    pub fn to_find_user_info(&self) -> FindUserInfo {
        FindUserInfo {
            xuid: self.xuid.unwrap_or_default(),
            gamertag: self.gamertag.clone().unwrap_or_default(),
        }
    }
}

impl From<&FindUserInfo> for UserResolutionEntry {
    fn from(info: &FindUserInfo) -> Self {
        Self {
            xuid: (!info.xuid.is_zero()).then_some(info.xuid),
            gamertag: (!info.gamertag.is_empty()).then(|| info.gamertag.clone()),
        }
    }
}

/// Ordered list of users to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserResolutionRequest {
    entries: Vec<UserResolutionEntry>,
}

impl UserResolutionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: UserResolutionEntry) {
        self.entries.push(entry);
    }

    pub fn push_xuid(&mut self, xuid: Xuid) {
        self.entries.push(UserResolutionEntry::by_xuid(xuid));
    }

    pub fn push_gamertag(&mut self, text: &str) -> TextFit {
        let (entry, fit) = UserResolutionEntry::by_gamertag(text);
        self.entries.push(entry);
        fit
    }

    pub fn entries(&self) -> &[UserResolutionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a request from the guest's lookup array.
    pub fn from_find_user_infos(infos: &[FindUserInfo]) -> Self {
        Self {
            entries: infos.iter().map(UserResolutionEntry::from).collect(),
        }
    }
}

/// Ordered list of resolved users returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserResolutionResponse {
    entries: Vec<UserResolutionEntry>,
}

impl UserResolutionResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: UserResolutionEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[UserResolutionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// First gamertag resolved for `xuid`
    pub fn gamertag_for(&self, xuid: Xuid) -> Option<&Gamertag> {
        self.entries
            .iter()
            .find(|entry| entry.xuid == Some(xuid))
            .and_then(|entry| entry.gamertag.as_ref())
    }

    /// Guest image: header at `base_address` followed by one entry per result.
    pub fn to_find_users_response(&self, base_address: u32) -> FindUsersResponse {
        FindUsersResponse::at(
            base_address,
            self.entries
                .iter()
                .map(UserResolutionEntry::to_find_user_info)
                .collect(),
        )
    }
}
