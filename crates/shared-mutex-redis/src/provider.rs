//! Redis mutex provider implementation.

use std::time::Duration;

use fred::prelude::*;
use shared_mutex_core::error::LockResult;
use shared_mutex_core::mutex::SharedMutex;
use shared_mutex_core::traits::MutexProvider;
use shared_mutex_core::ttl::Ttl;

use crate::store::{RedisStore, RedisStoreBuilder};

/// A shared mutex backed by Redis.
pub type RedisMutex = SharedMutex<RedisStore>;

/// Builder for Redis mutex provider configuration.
pub struct RedisMutexProviderBuilder {
    store: RedisStoreBuilder,
    ttl: Option<Duration>,
}

impl RedisMutexProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            store: RedisStoreBuilder::new(),
            ttl: None,
        }
    }

    /// Sets the Redis server URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.store = self.store.url(url);
        self
    }

    /// Uses an existing Redis client.
    pub fn client(mut self, client: RedisClient) -> Self {
        self.store = self.store.client(client);
        self
    }

    /// Sets the default lock TTL. `Duration::ZERO` disables expiry.
    ///
    /// Defaults to one hour.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Builds the provider.
    pub async fn build(self) -> LockResult<RedisMutexProvider> {
        let ttl = match self.ttl {
            Some(ttl) => Ttl::from_duration(ttl)?,
            None => Ttl::DEFAULT,
        };
        let store = self.store.build().await?;
        Ok(RedisMutexProvider { store, ttl })
    }
}

impl Default for RedisMutexProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider for Redis-based shared mutexes.
///
/// All mutexes created by one provider share its connection.
#[derive(Debug, Clone)]
pub struct RedisMutexProvider {
    store: RedisStore,
    ttl: Ttl,
}

impl RedisMutexProvider {
    /// Returns a new builder for configuring the provider.
    pub fn builder() -> RedisMutexProviderBuilder {
        RedisMutexProviderBuilder::new()
    }

    /// Creates a provider using the specified Redis URL.
    pub async fn new(url: impl Into<String>) -> LockResult<Self> {
        Self::builder().url(url).build().await
    }

    /// The store adapter shared by this provider's mutexes.
    pub fn store(&self) -> &RedisStore {
        &self.store
    }
}

impl MutexProvider for RedisMutexProvider {
    type Store = RedisStore;

    fn default_ttl(&self) -> Ttl {
        self.ttl
    }

    fn create_mutex_with_ttl(&self, name: &str, ttl: Ttl) -> LockResult<RedisMutex> {
        SharedMutex::new(self.store.clone(), name, ttl)
    }
}
