//! Session record and its lifecycle state machine
//!
//! # Lifecycle
//!
//! ```text
//! Lobby -> Registration -> InGame -> Reporting -> Deleted
//!   \______________________________________________^
//! ```
//!
//! `Deleted` is terminal. Every other move is rejected and leaves the record
//! untouched.
//!
//! # Invariants
//!
//! - For each slot category, `open + filled <= max`
//! - Rejected updates never partially apply

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::ids::{SessionId, Xuid};
use crate::value_objects::{ExchangeKey, HostAddress, SessionFlags};
use crate::wire::{XSessionInfo, XSessionLocalDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Lobby,
    Registration,
    InGame,
    Reporting,
    Deleted,
}

impl SessionState {
    pub fn can_transition_to(self, to: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, to),
            (Lobby, Registration)
                | (Registration, InGame)
                | (InGame, Reporting)
                | (Reporting, Deleted)
                | (Lobby, Deleted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Deleted)
    }

    /// Value of the console's session state enum
    pub fn to_wire(self) -> u32 {
        match self {
            SessionState::Lobby => 0,
            SessionState::Registration => 1,
            SessionState::InGame => 2,
            SessionState::Reporting => 3,
            SessionState::Deleted => 4,
        }
    }

    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            0 => Some(SessionState::Lobby),
            1 => Some(SessionState::Registration),
            2 => Some(SessionState::InGame),
            3 => Some(SessionState::Reporting),
            4 => Some(SessionState::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Lobby => write!(f, "Lobby"),
            SessionState::Registration => write!(f, "Registration"),
            SessionState::InGame => write!(f, "InGame"),
            SessionState::Reporting => write!(f, "Reporting"),
            SessionState::Deleted => write!(f, "Deleted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotCategory {
    Public,
    Private,
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotCategory::Public => write!(f, "Public"),
            SlotCategory::Private => write!(f, "Private"),
        }
    }
}

/// Open/filled counters for one slot category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotCounts {
    max: u32,
    open: u32,
    filled: u32,
}

impl SlotCounts {
    /// All `max` slots open, none filled.
    pub fn new(max: u32) -> Self {
        Self {
            max,
            open: max,
            filled: 0,
        }
    }

    pub fn with_counts(
        category: SlotCategory,
        max: u32,
        open: u32,
        filled: u32,
    ) -> Result<Self, DomainError> {
        check_capacity(category, max, open, filled)?;
        Ok(Self { max, open, filled })
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn open(&self) -> u32 {
        self.open
    }

    pub fn filled(&self) -> u32 {
        self.filled
    }
}

fn check_capacity(category: SlotCategory, max: u32, open: u32, filled: u32) -> Result<(), DomainError> {
    match open.checked_add(filled) {
        Some(total) if total <= max => Ok(()),
        _ => Err(DomainError::capacity(category, open, filled, max)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMember {
    pub xuid: Xuid,
    pub category: SlotCategory,
}

/// Metadata for one multiplayer session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    id: SessionId,
    state: SessionState,
    flags: SessionFlags,
    host_address: HostAddress,
    exchange_key: ExchangeKey,
    host_user_index: u32,
    game_type: u32,
    game_mode: u32,
    nonce: u64,
    arbitration_id: SessionId,
    public_slots: SlotCounts,
    private_slots: SlotCounts,
    members: Vec<SessionMember>,
}

impl SessionRecord {
    /// Create a session in the lobby with every slot open.
    pub fn new(id: SessionId, flags: SessionFlags, max_public: u32, max_private: u32) -> Self {
        Self {
            id,
            state: SessionState::Lobby,
            flags,
            host_address: HostAddress::default(),
            exchange_key: ExchangeKey::default(),
            host_user_index: 0,
            game_type: 0,
            game_mode: 0,
            nonce: 0,
            arbitration_id: SessionId::NONE,
            public_slots: SlotCounts::new(max_public),
            private_slots: SlotCounts::new(max_private),
            members: Vec::new(),
        }
    }

    pub fn with_host_address(mut self, host_address: HostAddress) -> Self {
        self.host_address = host_address;
        self
    }

    pub fn with_exchange_key(mut self, exchange_key: ExchangeKey) -> Self {
        self.exchange_key = exchange_key;
        self
    }

    pub fn with_host_user_index(mut self, index: u32) -> Self {
        self.host_user_index = index;
        self
    }

    pub fn with_game_type(mut self, game_type: u32, game_mode: u32) -> Self {
        self.game_type = game_type;
        self.game_mode = game_mode;
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn host_address(&self) -> &HostAddress {
        &self.host_address
    }

    pub fn exchange_key(&self) -> &ExchangeKey {
        &self.exchange_key
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn arbitration_id(&self) -> SessionId {
        self.arbitration_id
    }

    pub fn slots(&self, category: SlotCategory) -> SlotCounts {
        match category {
            SlotCategory::Public => self.public_slots,
            SlotCategory::Private => self.private_slots,
        }
    }

    pub fn members(&self) -> &[SessionMember] {
        &self.members
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Move to `to`, rejecting anything outside the lifecycle graph.
    pub fn transition_to(&mut self, to: SessionState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(to) {
            return Err(DomainError::invalid_transition(self.state, to));
        }
        tracing::debug!(session = %self.id, from = %self.state, %to, "session state change");
        self.state = to;
        Ok(())
    }

    /// Lobby -> Registration; records the arbitration id handed out.
    pub fn register(&mut self, arbitration_id: SessionId) -> Result<(), DomainError> {
        self.transition_to(SessionState::Registration)?;
        self.arbitration_id = arbitration_id;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), DomainError> {
        self.transition_to(SessionState::InGame)
    }

    pub fn end(&mut self) -> Result<(), DomainError> {
        self.transition_to(SessionState::Reporting)
    }

    pub fn delete(&mut self) -> Result<(), DomainError> {
        self.transition_to(SessionState::Deleted)
    }

    // =========================================================================
    // Slot accounting
    // =========================================================================

    fn slots_mut(&mut self, category: SlotCategory) -> &mut SlotCounts {
        match category {
            SlotCategory::Public => &mut self.public_slots,
            SlotCategory::Private => &mut self.private_slots,
        }
    }

    fn member_count(&self, category: SlotCategory) -> u32 {
        let count = self
            .members
            .iter()
            .filter(|member| member.category == category)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Capacity-checked write; membership is the caller's concern.
    fn write_slot_counts(
        &mut self,
        category: SlotCategory,
        open: u32,
        filled: u32,
    ) -> Result<(), DomainError> {
        let slots = self.slots(category);
        let updated = SlotCounts::with_counts(category, slots.max, open, filled)?;
        *self.slots_mut(category) = updated;
        Ok(())
    }

    /// Overwrite the open/filled counters for a category (e.g. from a backend
    /// response). The maximum is unchanged, and `filled` may not drop below
    /// the members tracked in that category.
    pub fn set_slot_counts(
        &mut self,
        category: SlotCategory,
        open: u32,
        filled: u32,
    ) -> Result<(), DomainError> {
        let members = self.member_count(category);
        if filled < members {
            return Err(DomainError::validation(format!(
                "{} filled count {} is below the {} tracked members",
                category, filled, members
            )));
        }
        self.write_slot_counts(category, open, filled)
    }

    /// Move `count` slots from open to filled.
    pub fn fill_slots(&mut self, category: SlotCategory, count: u32) -> Result<(), DomainError> {
        let slots = self.slots(category);
        let filled = slots.filled.saturating_add(count);
        let open = slots
            .open
            .checked_sub(count)
            .ok_or_else(|| DomainError::capacity(category, slots.open, filled, slots.max))?;
        self.write_slot_counts(category, open, filled)
    }

    /// Counters after moving `count` slots from filled back to open.
    fn released_counts(
        &self,
        category: SlotCategory,
        count: u32,
    ) -> Result<(u32, u32), DomainError> {
        let slots = self.slots(category);
        let filled = slots.filled.checked_sub(count).ok_or_else(|| {
            DomainError::validation(format!(
                "cannot release {} {} slots, only {} filled",
                count, category, slots.filled
            ))
        })?;
        Ok((slots.open.saturating_add(count), filled))
    }

    /// Move `count` slots from filled back to open. Slots held by tracked
    /// members are released through [`Self::leave`] instead.
    pub fn release_slots(&mut self, category: SlotCategory, count: u32) -> Result<(), DomainError> {
        let (open, filled) = self.released_counts(category, count)?;
        self.set_slot_counts(category, open, filled)
    }

    /// Add members, filling one slot each. All-or-nothing.
    pub fn join(&mut self, xuids: &[Xuid], category: SlotCategory) -> Result<(), DomainError> {
        let count = u32::try_from(xuids.len())
            .map_err(|_| DomainError::validation("too many members in one join"))?;
        self.fill_slots(category, count)?;
        self.members
            .extend(xuids.iter().map(|&xuid| SessionMember { xuid, category }));
        Ok(())
    }

    /// Remove members that are present, releasing their slots. Unknown xuids
    /// are ignored.
    pub fn leave(&mut self, xuids: &[Xuid]) -> Result<(), DomainError> {
        let mut public = 0u32;
        let mut private = 0u32;
        let mut remaining = Vec::with_capacity(self.members.len());
        for member in &self.members {
            if xuids.contains(&member.xuid) {
                match member.category {
                    SlotCategory::Public => public += 1,
                    SlotCategory::Private => private += 1,
                }
            } else {
                remaining.push(*member);
            }
        }

        let before = (self.public_slots, self.private_slots);
        let result = [(SlotCategory::Public, public), (SlotCategory::Private, private)]
            .into_iter()
            .try_for_each(|(category, count)| {
                let (open, filled) = self.released_counts(category, count)?;
                self.write_slot_counts(category, open, filled)
            });
        if let Err(err) = result {
            (self.public_slots, self.private_slots) = before;
            return Err(err);
        }
        self.members = remaining;
        Ok(())
    }

    /// Apply a modify request: new flags and new maximums.
    ///
    /// Filled counts are preserved and open counts recomputed; a maximum
    /// smaller than the filled count is rejected.
    pub fn modify(
        &mut self,
        flags: SessionFlags,
        max_public: u32,
        max_private: u32,
    ) -> Result<(), DomainError> {
        let public = rescale(SlotCategory::Public, self.public_slots, max_public)?;
        let private = rescale(SlotCategory::Private, self.private_slots, max_private)?;
        self.flags = self.flags.modified(flags);
        self.public_slots = public;
        self.private_slots = private;
        Ok(())
    }

    // =========================================================================
    // Wire images
    // =========================================================================

    pub fn to_session_info(&self) -> XSessionInfo {
        XSessionInfo {
            host_address: self.host_address,
            session_id: self.id,
            key_exchange_key: self.exchange_key,
        }
    }

    /// Local details block; `members_address` is the guest pointer to the
    /// member array, which the caller owns.
    pub fn to_local_details(&self, members_address: u32) -> XSessionLocalDetails {
        let member_count = self.members.len() as u32;
        XSessionLocalDetails {
            user_index_host: self.host_user_index,
            game_type: self.game_type,
            game_mode: self.game_mode,
            flags: self.flags.bits(),
            max_public_slots: self.public_slots.max,
            max_private_slots: self.private_slots.max,
            available_public_slots: self.public_slots.open,
            available_private_slots: self.private_slots.open,
            actual_member_count: member_count,
            returned_member_count: member_count,
            state: self.state.to_wire(),
            nonce: self.nonce,
            session_info: self.to_session_info(),
            arbitration_id: self.arbitration_id,
            members_address,
        }
    }
}

fn rescale(category: SlotCategory, slots: SlotCounts, max: u32) -> Result<SlotCounts, DomainError> {
    let open = max
        .checked_sub(slots.filled)
        .ok_or_else(|| DomainError::capacity(category, 0, slots.filled, max))?;
    SlotCounts::with_counts(category, max, open, slots.filled)
}
