//! Logical lock state.

use std::fmt;

/// Whether a lock record currently exists in the store.
///
/// Always derived from a fresh store query; never cached on a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockState {
    Unlocked,
    Locked,
}

impl LockState {
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl From<bool> for LockState {
    fn from(exists: bool) -> Self {
        if exists {
            Self::Locked
        } else {
            Self::Unlocked
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlocked => f.write_str("unlocked"),
            Self::Locked => f.write_str("locked"),
        }
    }
}
