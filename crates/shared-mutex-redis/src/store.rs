//! Redis store adapter.

use std::fmt;

use fred::prelude::*;
use shared_mutex_core::error::{LockError, LockResult};
use shared_mutex_core::traits::MutexStore;
use shared_mutex_core::ttl::Ttl;
use tracing::{debug, instrument};

use crate::subscription::RedisSubscription;

/// Connection descriptor used when neither a URL nor a client is given.
pub const DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Value stored under a lock key. Only presence matters.
const SENTINEL: &str = "1";

/// Maps a fred error to [`LockError::StoreUnavailable`], tagged with the
/// command that failed.
pub(crate) fn store_error(op: &'static str) -> impl FnOnce(RedisError) -> LockError {
    move |e| LockError::StoreUnavailable(Box::new(std::io::Error::other(format!(
        "Redis {} failed: {}",
        op, e
    ))))
}

/// Builder for [`RedisStore`].
#[derive(Default)]
pub struct RedisStoreBuilder {
    url: Option<String>,
    client: Option<RedisClient>,
}

impl RedisStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection descriptor, e.g. `redis://localhost:6379`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Uses an existing client instead of opening a new connection.
    ///
    /// The client is used as-is; connecting it is the caller's job.
    pub fn client(mut self, client: RedisClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the store, connecting if a URL (or nothing) was given.
    #[instrument(skip(self), fields(backend = "redis"))]
    pub async fn build(self) -> LockResult<RedisStore> {
        let client = match (self.url, self.client) {
            (Some(_), Some(_)) => {
                return Err(LockError::InvalidArgument(
                    "provide either a Redis URL or an existing client, not both".to_string(),
                ));
            }
            (None, Some(client)) => client,
            (url, None) => {
                let url = url.unwrap_or_else(|| DEFAULT_URL.to_string());
                let config = RedisConfig::from_url(&url).map_err(|e| {
                    LockError::InvalidArgument(format!("invalid Redis URL: {}", e))
                })?;

                let client = RedisClient::new(config, None, None, None);
                client.connect();
                client.wait_for_connect().await.map_err(store_error("connect"))?;
                debug!("connected to redis");
                client
            }
        };

        Ok(RedisStore { client })
    }
}

/// [`MutexStore`] over a single Redis instance.
///
/// Cloning is cheap and shares the underlying connection, so one store can
/// back any number of mutexes. Subscriptions open their own connection since
/// a Redis connection in subscribe mode cannot issue other commands.
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    /// Returns a new builder for configuring the store.
    pub fn builder() -> RedisStoreBuilder {
        RedisStoreBuilder::new()
    }

    /// Connects to the given Redis URL.
    pub async fn new(url: impl Into<String>) -> LockResult<Self> {
        Self::builder().url(url).build().await
    }

    /// Wraps an existing client without touching its connection.
    pub fn from_client(client: RedisClient) -> Self {
        Self { client }
    }

    /// The underlying command client.
    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("client", &self.client.id())
            .finish()
    }
}

impl MutexStore for RedisStore {
    type Subscription = RedisSubscription;

    const BACKEND: &'static str = "redis";

    async fn set_if_absent(&self, key: &str, ttl: Ttl) -> LockResult<bool> {
        // SET key 1 NX [PX ms] in one command
        let result: Option<String> = self
            .client
            .set(
                key,
                SENTINEL,
                ttl.as_millis().map(Expiration::PX),
                Some(SetOptions::NX),
                false,
            )
            .await
            .map_err(store_error("SET NX"))?;

        // SET NX returns OK if the key was set, nil if it already exists
        Ok(result.is_some())
    }

    async fn exists(&self, key: &str) -> LockResult<bool> {
        let count: i64 = self
            .client
            .exists(key)
            .await
            .map_err(store_error("EXISTS"))?;
        Ok(count == 1)
    }

    async fn delete(&self, key: &str) -> LockResult<()> {
        let _: i64 = self.client.del(key).await.map_err(store_error("DEL"))?;
        Ok(())
    }

    async fn publish(&self, channel: &str, message: &str) -> LockResult<()> {
        let receivers: i64 = self
            .client
            .publish(channel, message)
            .await
            .map_err(store_error("PUBLISH"))?;
        debug!(channel, message, receivers, "published");
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "redis"))]
    async fn subscribe(&self, channel: &str) -> LockResult<RedisSubscription> {
        RedisSubscription::open(&self.client, channel).await
    }
}
