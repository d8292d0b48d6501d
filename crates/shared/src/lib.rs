//! xonline Shared - JSON bridge between console records and the backend service
//!
//! Each backend document kind has one object here that encodes its request
//! and decodes its response into the records from `xonline-domain`:
//! - User resolution (`UsersInfo` lookups)
//! - Presence publication
//! - Friends presence refresh
//! - Session listings
//!
//! # Design Principles
//!
//! 1. **No transport** - callers move the JSON text; this crate only shapes it
//! 2. **Document order** - encoding goes through typed DTOs, never `Value`
//! 3. **Partial data survives** - malformed entries are logged and skipped,
//!    a malformed document is reported as [`BridgeError::MalformedInput`]

pub mod error;
pub mod friends;
pub mod json_object;
pub mod presence;
pub mod session;
pub mod users;

pub use error::BridgeError;
pub use friends::FriendsCollection;
pub use json_object::{session_id_to_hex, xuid_to_hex, JsonObject};
pub use presence::PresenceCollection;
pub use session::SessionObject;
pub use users::UserResolution;
