//! Core traits for shared mutexes.

use std::future::Future;

use crate::error::LockResult;
use crate::mutex::SharedMutex;
use crate::ttl::Ttl;

// ============================================================================
// Store Adapter Trait
// ============================================================================

/// The capability set a backing store must offer for [`SharedMutex`].
///
/// Implementations normalize a concrete client (Redis, an in-memory fake,
/// ...) into these five primitives. They must not retry internally and must
/// not serialize calls in-process: cross-process correctness comes entirely
/// from the store's own per-key atomicity.
///
/// Every transport failure is reported as
/// [`LockError::StoreUnavailable`](crate::error::LockError::StoreUnavailable).
pub trait MutexStore: Send + Sync {
    /// Subscription type returned by [`MutexStore::subscribe`].
    type Subscription: NotificationSubscription;

    /// Short backend name used in tracing spans.
    const BACKEND: &'static str;

    /// Atomically creates `key` holding a sentinel value if it is absent.
    ///
    /// When `ttl` carries a duration the key expires after that many
    /// milliseconds. Returns `true` iff this call created the key; of any
    /// number of concurrent callers at most one observes `true`.
    fn set_if_absent(&self, key: &str, ttl: Ttl) -> impl Future<Output = LockResult<bool>> + Send;

    /// Point-in-time existence check. Advisory only.
    fn exists(&self, key: &str) -> impl Future<Output = LockResult<bool>> + Send;

    /// Removes `key`. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> impl Future<Output = LockResult<()>> + Send;

    /// Broadcasts `message` on `channel`. Having no subscribers is not an error.
    fn publish(&self, channel: &str, message: &str)
    -> impl Future<Output = LockResult<()>> + Send;

    /// Starts listening on `channel`.
    ///
    /// Returns once the subscription is established; only messages published
    /// after that point are delivered, in publish order.
    fn subscribe(&self, channel: &str)
    -> impl Future<Output = LockResult<Self::Subscription>> + Send;
}

/// A live subscription to one channel.
pub trait NotificationSubscription: Send + Sized {
    /// Waits for the next message payload.
    ///
    /// Returns `Ok(None)` once the subscription has been closed.
    fn next_message(&mut self) -> impl Future<Output = LockResult<Option<String>>> + Send;

    /// Unsubscribes and frees the underlying connection.
    fn close(self) -> impl Future<Output = LockResult<()>> + Send;
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Factory for creating shared mutexes by name.
///
/// Providers own the store adapter and the default TTL, so application code
/// only deals in identifiers.
///
/// # Example
///
/// ```rust,ignore
/// let provider = RedisMutexProvider::new("redis://localhost:6379").await?;
/// let mutex = provider.create_mutex("invoice:42")?;
/// mutex.acquire().await?;
/// ```
pub trait MutexProvider: Send + Sync {
    /// The store adapter handed to every mutex.
    type Store: MutexStore + Clone;

    /// TTL used by [`MutexProvider::create_mutex`].
    fn default_ttl(&self) -> Ttl;

    /// Creates a mutex with an explicit TTL.
    fn create_mutex_with_ttl(&self, name: &str, ttl: Ttl) -> LockResult<SharedMutex<Self::Store>>;

    /// Creates a mutex with the provider's default TTL.
    fn create_mutex(&self, name: &str) -> LockResult<SharedMutex<Self::Store>> {
        self.create_mutex_with_ttl(name, self.default_ttl())
    }
}

// ============================================================================
// Convenience Extensions
// ============================================================================

/// Extension trait providing convenience methods for mutex providers.
pub trait MutexProviderExt: MutexProvider {
    /// Creates and acquires a mutex, returning it for a later `release()`.
    ///
    /// Fails with `AlreadyLocked` if the mutex is held.
    fn acquire_mutex(
        &self,
        name: &str,
    ) -> impl Future<Output = LockResult<SharedMutex<Self::Store>>> + Send
    where
        Self: Sync,
    {
        async move {
            let mutex = self.create_mutex(name)?;
            mutex.acquire().await?;
            Ok(mutex)
        }
    }

    /// Creates and tries to acquire a mutex.
    ///
    /// Returns `Ok(None)` if the mutex is held elsewhere.
    fn try_acquire_mutex(
        &self,
        name: &str,
    ) -> impl Future<Output = LockResult<Option<SharedMutex<Self::Store>>>> + Send
    where
        Self: Sync,
    {
        async move {
            let mutex = self.create_mutex(name)?;
            if mutex.try_acquire().await? {
                Ok(Some(mutex))
            } else {
                Ok(None)
            }
        }
    }
}

// Blanket implementation for all MutexProviders
impl<T: MutexProvider> MutexProviderExt for T {}
