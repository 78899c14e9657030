//! Lock identifier validation.
//!
//! The identifier is used verbatim as both the store key and the pub/sub
//! channel, so it is never encoded or prefixed: every process sharing a
//! deployment must derive the same key from the same resource.

use crate::error::{LockError, LockResult};

/// Checks that `name` is usable as a lock identifier.
pub fn validate_lock_name(name: &str) -> LockResult<()> {
    if name.is_empty() {
        return Err(LockError::InvalidArgument(
            "mutex identifier must not be empty".to_string(),
        ));
    }
    Ok(())
}
