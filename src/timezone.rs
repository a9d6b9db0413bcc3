//! Timezone lookup and the clock used to stamp transactions.

use time::{OffsetDateTime, UtcOffset, macros::offset};
use time_tz::{Offset, TimeZone};

/// The canonical name of the timezone transactions are stamped in by default.
pub const DEFAULT_TIMEZONE: &str = "Asia/Colombo";

/// The UTC offset of Sri Lanka Standard Time.
pub const SRI_LANKA_OFFSET: UtcOffset = offset!(+5:30);

/// Get the current UTC offset for a canonical timezone name, e.g. "Asia/Colombo".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// A source for the current date and time.
pub trait Clock: Send + Sync {
    /// The current date and time.
    fn now(&self) -> OffsetDateTime;
}

/// Reads the system clock and converts it to a fixed UTC offset.
///
/// Times are truncated to microseconds so that they survive a round trip
/// through the database unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOffsetClock {
    offset: UtcOffset,
}

impl FixedOffsetClock {
    /// Create a clock that reports times at `offset`.
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Default for FixedOffsetClock {
    fn default() -> Self {
        Self::new(SRI_LANKA_OFFSET)
    }
}

impl Clock for FixedOffsetClock {
    fn now(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);

        now.replace_microsecond(now.microsecond()).unwrap_or(now)
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrozenClock(pub OffsetDateTime);

impl Clock for FrozenClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
