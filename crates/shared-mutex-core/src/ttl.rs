//! Lock time-to-live values.

use std::time::Duration;

use crate::error::{LockError, LockResult};

/// Expiry applied to a lock record when it is created.
///
/// - `Ttl::NONE` (or a zero duration) - the record persists until released
/// - any positive duration - the store removes the record after that long
///
/// Sub-millisecond durations round up to one millisecond so a requested
/// expiry is never dropped on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ttl {
    millis: Option<u64>, // None for no expiry
}

impl Ttl {
    pub const NONE: Self = Self { millis: None };

    /// One hour, the default lease length handed out by providers.
    pub const DEFAULT: Self = Self {
        millis: Some(60 * 60 * 1000),
    };

    /// Longest accepted TTL in milliseconds.
    ///
    /// Stores compute `now + ttl` as a signed 64-bit millisecond timestamp,
    /// so half of that range leaves room for any realistic clock.
    pub const MAX_MILLIS: u64 = (i64::MAX / 2) as u64;

    /// Creates a TTL from milliseconds. Zero means no expiry.
    pub fn from_millis(millis: u64) -> LockResult<Self> {
        if millis > Self::MAX_MILLIS {
            return Err(LockError::InvalidArgument(format!(
                "ttl of {millis}ms exceeds the maximum of {}ms",
                Self::MAX_MILLIS
            )));
        }
        Ok(Self {
            millis: (millis > 0).then_some(millis),
        })
    }

    /// Creates a TTL from a duration. A zero duration means no expiry.
    pub fn from_duration(duration: Duration) -> LockResult<Self> {
        if duration.is_zero() {
            return Ok(Self::NONE);
        }
        let millis = duration.as_millis().max(1);
        let millis = u64::try_from(millis).map_err(|_| {
            LockError::InvalidArgument(format!("ttl of {duration:?} is too large"))
        })?;
        Self::from_millis(millis)
    }

    pub fn is_none(&self) -> bool {
        self.millis.is_none()
    }

    /// Milliseconds to pass as the store's PX argument, if any.
    pub fn as_millis(&self) -> Option<i64> {
        // from_millis rejects anything above MAX_MILLIS
        self.millis.map(|ms| ms as i64)
    }

    pub fn as_duration(&self) -> Option<Duration> {
        self.millis.map(Duration::from_millis)
    }
}

impl TryFrom<Option<Duration>> for Ttl {
    type Error = LockError;

    fn try_from(ttl: Option<Duration>) -> LockResult<Self> {
        match ttl {
            None => Ok(Self::NONE),
            Some(d) => Self::from_duration(d),
        }
    }
}

impl TryFrom<Duration> for Ttl {
    type Error = LockError;

    fn try_from(ttl: Duration) -> LockResult<Self> {
        Self::from_duration(ttl)
    }
}
