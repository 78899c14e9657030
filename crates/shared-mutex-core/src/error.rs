//! Error types for shared mutex operations.

use thiserror::Error;

/// Errors that can occur during mutex operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// The mutex is already held by some holder (possibly this process).
    ///
    /// This is an expected contention outcome, not a fault. Callers may retry,
    /// back off, or wait for an `unlocked` notification.
    #[error("cannot lock '{name}': mutex is already locked")]
    AlreadyLocked { name: String },

    /// The backing store could not be reached or rejected the command.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Malformed identifier, TTL or connection descriptor.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl LockError {
    /// Wraps any store/transport error as [`LockError::StoreUnavailable`].
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StoreUnavailable(Box::new(err))
    }

    /// Returns true for contention failures.
    pub fn is_already_locked(&self) -> bool {
        matches!(self, Self::AlreadyLocked { .. })
    }

    /// Returns true for transport-level failures.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Result type for mutex operations.
pub type LockResult<T> = Result<T, LockError>;
