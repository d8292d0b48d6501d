use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Parse up to 16 hex digits into a 64-bit value.
///
/// The text encodes the value as it appears on the wire, most significant
/// digit first, so `"0000000000000001"` is 1.
pub fn parse_hex_u64(text: &str) -> Result<u64, DomainError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 16 {
        return Err(DomainError::parse(format!(
            "Expected 1-16 hex digits, got '{}'",
            text
        )));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| DomainError::parse(format!("Invalid hex value '{}': {}", text, e)))
}

macro_rules! define_id {
    ($name:ident, $repr:ty, $width:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($repr);

        impl $name {
            pub const fn new(value: $repr) -> Self {
                Self(value)
            }

            pub const fn value(self) -> $repr {
                self.0
            }

            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }

            pub const fn to_be_bytes(self) -> [u8; std::mem::size_of::<$repr>()] {
                self.0.to_be_bytes()
            }

            pub const fn from_be_bytes(bytes: [u8; std::mem::size_of::<$repr>()]) -> Self {
                Self(<$repr>::from_be_bytes(bytes))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!("{:0", $width, "X}"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = parse_hex_u64(s)?;
                <$repr>::try_from(value).map(Self).map_err(|_| {
                    DomainError::parse(format!(
                        concat!(stringify!($name), " out of range: '{}'"),
                        s
                    ))
                })
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// User account identifier
define_id!(Xuid, u64, 16);

// Title (game) identifier
define_id!(TitleId, u32, 8);

// =============================================================================
// Session identifiers
// =============================================================================

/// Mask covering the random (non-tag) portion of a session identifier
const SESSION_RANDOM_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// Purpose tag stored in the top byte of a session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SessionTag {
    Online = 0xAE,
    SystemLink = 0x00,
    Server = 0xC0,
}

impl SessionTag {
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

/// Classification of an arbitrary 64-bit session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Online,
    SystemLink,
    Server,
    /// Zero, or a tag byte that is not recognized
    Invalid,
}

impl SessionKind {
    /// The tag this kind was generated with, if any
    pub fn tag(self) -> Option<SessionTag> {
        match self {
            SessionKind::Online => Some(SessionTag::Online),
            SessionKind::SystemLink => Some(SessionTag::SystemLink),
            SessionKind::Server => Some(SessionTag::Server),
            SessionKind::Invalid => None,
        }
    }
}

impl From<SessionTag> for SessionKind {
    fn from(tag: SessionTag) -> Self {
        match tag {
            SessionTag::Online => SessionKind::Online,
            SessionTag::SystemLink => SessionKind::SystemLink,
            SessionTag::Server => SessionKind::Server,
        }
    }
}

/// Source of random bits for identifier generation.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    fn next_u64(&self) -> u64;
}

/// Thread-local RNG backed random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_u64(&self) -> u64 {
        rand::thread_rng().gen()
    }
}

/// 64-bit session identifier (XNKID) whose top byte tags its purpose.
///
/// Any raw value can be held, since guests hand us whatever is in memory;
/// use [`SessionId::classify`] or [`SessionId::is_valid`] before trusting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// The "no session" value used by presence records
    pub const NONE: SessionId = SessionId(0);

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Construct from a raw value, rejecting zero and unknown tags.
    pub fn try_new(raw: u64) -> Result<Self, DomainError> {
        let id = Self(raw);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(DomainError::InvalidIdentifier(raw))
        }
    }

    /// Generate a new identifier for `tag` using the thread RNG.
    pub fn generate(tag: SessionTag) -> Self {
        Self::generate_with(tag, &ThreadRandom)
    }

    /// Generate a new identifier for `tag` from an explicit random source.
    ///
    /// An all-zero result is never returned; the low bits are redrawn
    /// until the combined value is nonzero.
    pub fn generate_with(tag: SessionTag, source: &dyn RandomSource) -> Self {
        let high = u64::from(tag.byte()) << 56;
        loop {
            let raw = high | (source.next_u64() & SESSION_RANDOM_MASK);
            if raw != 0 {
                return Self(raw);
            }
            tracing::debug!(?tag, "random source produced a zero session id, redrawing");
        }
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn tag_byte(self) -> u8 {
        (self.0 >> 56) as u8
    }

    pub fn classify(self) -> SessionKind {
        if self.0 == 0 {
            return SessionKind::Invalid;
        }
        match self.tag_byte() {
            0xAE => SessionKind::Online,
            0x00 => SessionKind::SystemLink,
            0xC0 => SessionKind::Server,
            _ => SessionKind::Invalid,
        }
    }

    pub fn is_valid(self) -> bool {
        self.classify() != SessionKind::Invalid
    }

    pub fn is_online(self) -> bool {
        self.classify() == SessionKind::Online
    }

    pub fn is_system_link(self) -> bool {
        self.classify() == SessionKind::SystemLink
    }

    pub fn is_server(self) -> bool {
        self.classify() == SessionKind::Server
    }

    /// Big-endian byte image as stored in guest memory
    pub const fn to_wire_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub const fn from_wire_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_u64(s).map(Self)
    }
}

impl From<SessionId> for u64 {
    fn from(value: SessionId) -> Self {
        value.0
    }
}
