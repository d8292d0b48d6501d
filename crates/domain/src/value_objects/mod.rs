//! Value objects for the domain layer
//!
//! Bounded text, addresses, timestamps, and bit sets shared by the records.

mod exchange_key;
mod file_time;
mod gamertag;
mod host_address;
mod presence_state;
mod rich_presence;
mod session_flags;
mod settings;
mod text_fit;

pub use exchange_key::{ExchangeKey, EXCHANGE_KEY_SIZE};
pub use file_time::FileTime;
pub use gamertag::{Gamertag, GAMERTAG_FIELD_SIZE, GAMERTAG_MAX_LEN};
pub use host_address::{HostAddress, MacAddress};
pub use presence_state::{PresenceState, UserState};
pub use rich_presence::{RichPresence, RICH_PRESENCE_INTERNAL_CAP, RICH_PRESENCE_WIRE_CAP};
pub use session_flags::SessionFlags;
pub use settings::{NetworkMode, OnlineSettings};
pub use text_fit::TextFit;
