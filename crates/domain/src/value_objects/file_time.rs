//! Windows FILETIME timestamps
//!
//! Console structures timestamp presence changes and invites as 100ns ticks
//! since 1601-01-01 UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds between 1601-01-01 and the Unix epoch
const UNIX_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

const TICKS_PER_SECOND: i64 = 10_000_000;

const NANOS_PER_TICK: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTime(u64);

impl FileTime {
    pub const ZERO: FileTime = FileTime(0);

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert a UTC instant; instants before 1601 saturate to zero.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let secs = at.timestamp().saturating_add(UNIX_EPOCH_OFFSET_SECS);
        if secs < 0 {
            return Self::ZERO;
        }
        let ticks = secs
            .saturating_mul(TICKS_PER_SECOND)
            .saturating_add(i64::from(at.timestamp_subsec_nanos() / NANOS_PER_TICK));
        Self(ticks as u64)
    }

    /// Convert back to a UTC instant, if representable.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let ticks = i64::try_from(self.0).ok()?;
        let secs = ticks / TICKS_PER_SECOND - UNIX_EPOCH_OFFSET_SECS;
        let nanos = (ticks % TICKS_PER_SECOND) as u32 * NANOS_PER_TICK;
        DateTime::from_timestamp(secs, nanos)
    }

    /// High and low dwords as laid out in a FILETIME struct
    pub const fn to_parts(self) -> (u32, u32) {
        ((self.0 >> 32) as u32, self.0 as u32)
    }

    pub const fn from_parts(high: u32, low: u32) -> Self {
        Self(((high as u64) << 32) | low as u64)
    }
}

impl From<DateTime<Utc>> for FileTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self::from_datetime(at)
    }
}
