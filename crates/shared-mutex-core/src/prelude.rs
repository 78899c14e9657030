//! Convenience prelude for shared mutex types.

pub use crate::error::{LockError, LockResult};
pub use crate::mutex::{NotificationStream, SharedMutex};
pub use crate::notification::Notification;
pub use crate::state::LockState;
pub use crate::traits::{MutexProvider, MutexProviderExt, MutexStore, NotificationSubscription};
pub use crate::ttl::Ttl;
