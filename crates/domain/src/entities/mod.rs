//! Records exchanged between the guest shim and the backend bridge

pub mod friend;
pub mod presence;
pub mod session;
pub mod user_resolution;

pub use friend::FriendRecord;
pub use presence::PresenceRecord;
pub use session::{SessionMember, SessionRecord, SessionState, SlotCategory, SlotCounts};
pub use user_resolution::{UserResolutionEntry, UserResolutionRequest, UserResolutionResponse};
