//! Lock-state notifications and their wire payloads.
//!
//! Every successful acquire publishes `locked` and every release publishes
//! `unlocked` on the channel named after the lock identifier. Expiry is
//! silent. Notifications are hints: by the time a subscriber handles one the
//! record may already have changed again.

use std::fmt;
use std::str::FromStr;

/// Payload published on acquire.
pub const LOCKED_PAYLOAD: &str = "locked";
/// Payload published on release.
pub const UNLOCKED_PAYLOAD: &str = "unlocked";

/// A message received on a mutex's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Locked,
    Unlocked,
    /// Any payload this library never publishes.
    Other(String),
}

impl Notification {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Locked => LOCKED_PAYLOAD,
            Self::Unlocked => UNLOCKED_PAYLOAD,
            Self::Other(payload) => payload,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Notification {
    type Err = std::convert::Infallible;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(payload.to_string()))
    }
}

impl From<String> for Notification {
    fn from(payload: String) -> Self {
        match payload.as_str() {
            LOCKED_PAYLOAD => Self::Locked,
            UNLOCKED_PAYLOAD => Self::Unlocked,
            _ => Self::Other(payload),
        }
    }
}
