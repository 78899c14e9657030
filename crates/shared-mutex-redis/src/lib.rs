//! Redis backend for shared mutexes.
//!
//! Locks are single keys created with `SET key 1 NX PX <ttl>`; transitions
//! are announced with `PUBLISH <key> locked|unlocked`.

pub mod provider;
pub mod store;
pub mod subscription;

pub use provider::{RedisMutex, RedisMutexProvider, RedisMutexProviderBuilder};
pub use store::{RedisStore, RedisStoreBuilder, DEFAULT_URL};
pub use subscription::RedisSubscription;
