//! Distributed mutual-exclusion locks over a shared key-value store.
//!
//! A [`SharedMutex`] guards a named resource across processes and machines.
//! The backing store is the single source of truth: a lock is held exactly
//! when its key exists, and acquisition is decided by the store's atomic
//! create-if-absent. There is no lock manager process and no background work.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shared_mutex::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = RedisMutexProvider::builder()
//!         .url("redis://localhost:6379")
//!         .ttl(Duration::from_secs(30))
//!         .build()
//!         .await?;
//!
//!     let mutex = provider.create_mutex("my-resource")?;
//!
//!     // Non-blocking: fails with AlreadyLocked if someone holds it
//!     mutex.acquire().await?;
//!     println!("Doing critical work...");
//!     mutex.release().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Notifications
//!
//! Each successful acquire publishes `locked`, and each release publishes
//! `unlocked`, on a channel named after the mutex. Waiters can subscribe
//! instead of polling:
//!
//! ```rust,no_run
//! # use shared_mutex::*;
//! # async fn wait(mutex: &RedisMutex) -> LockResult<()> {
//! let mut notifications = mutex.subscribe().await?;
//! while !mutex.try_acquire().await? {
//!     if notifications.next().await?.is_none() {
//!         break;
//!     }
//! }
//! notifications.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Expiry is silent: a lock reclaimed through its TTL publishes nothing.
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `shared-mutex-core`: traits, errors, and the protocol engine
//! - `shared-mutex-redis`: Redis backend

// Re-export core types and traits
pub use shared_mutex_core::*;

// Re-export redis backend
pub use shared_mutex_redis::*;
