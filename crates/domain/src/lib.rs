//! xonline Domain - records and wire layouts for the console online service
//!
//! Session identifiers, the session lifecycle, presence and friend records,
//! user resolution, and the fixed big-endian structures the guest reads.
//! Nothing here performs I/O; the JSON bridge lives in `xonline-shared`.

pub mod context;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;
pub mod wire;

pub use context::{OnlineContext, ServiceStatus, VersionMismatch};

pub use entities::{
    FriendRecord, PresenceRecord, SessionMember, SessionRecord, SessionState, SlotCategory,
    SlotCounts, UserResolutionEntry, UserResolutionRequest, UserResolutionResponse,
};

pub use error::DomainError;

pub use ids::{RandomSource, SessionId, SessionKind, SessionTag, ThreadRandom, TitleId, Xuid};

pub use value_objects::{
    ExchangeKey, FileTime, Gamertag, HostAddress, MacAddress, NetworkMode, OnlineSettings,
    PresenceState, RichPresence, SessionFlags, TextFit, UserState,
};

pub use wire::{WireError, WireStruct};
