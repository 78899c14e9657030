//! In-memory store for exercising the mutex protocol without Redis.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use shared_mutex_core::error::{LockError, LockResult};
use shared_mutex_core::mutex::SharedMutex;
use shared_mutex_core::traits::{MutexProvider, MutexStore, NotificationSubscription};
use shared_mutex_core::ttl::Ttl;
use tokio::sync::broadcast;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Inner {
    /// key -> expiry deadline (None = no expiry)
    keys: Mutex<HashMap<String, Option<Instant>>>,
    channels: Mutex<HashMap<String, broadcast::Sender<String>>>,
    published: Mutex<Vec<(String, String)>>,
    unavailable: AtomicBool,
    publish_failing: AtomicBool,
}

/// Mock store with SET NX PX semantics and fire-and-forget pub/sub.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    inner: Arc<Inner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes only `publish` fail, leaving keys writable.
    pub fn set_publish_failing(&self, failing: bool) {
        self.inner.publish_failing.store(failing, Ordering::SeqCst);
    }

    /// Payloads published on `channel`, in order.
    pub fn published(&self, channel: &str) -> Vec<String> {
        self.inner
            .published
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Whether `key` is present, bypassing the availability switch.
    pub fn contains_key(&self, key: &str) -> bool {
        let mut keys = self.inner.keys.lock().unwrap();
        Self::live_entry(&mut keys, key)
    }

    fn check_available(&self) -> LockResult<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(LockError::store(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock store unavailable",
            )));
        }
        Ok(())
    }

    /// Drops `key` if its deadline has passed; returns whether it is live.
    fn live_entry(keys: &mut HashMap<String, Option<Instant>>, key: &str) -> bool {
        match keys.get(key) {
            Some(Some(deadline)) if *deadline <= Instant::now() => {
                keys.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}

impl MutexStore for MockStore {
    type Subscription = MockSubscription;

    const BACKEND: &'static str = "mock";

    async fn set_if_absent(&self, key: &str, ttl: Ttl) -> LockResult<bool> {
        self.check_available()?;
        let mut keys = self.inner.keys.lock().unwrap();
        if Self::live_entry(&mut keys, key) {
            return Ok(false);
        }
        let deadline = ttl.as_duration().map(|ttl| Instant::now() + ttl);
        keys.insert(key.to_string(), deadline);
        Ok(true)
    }

    async fn exists(&self, key: &str) -> LockResult<bool> {
        self.check_available()?;
        let mut keys = self.inner.keys.lock().unwrap();
        Ok(Self::live_entry(&mut keys, key))
    }

    async fn delete(&self, key: &str) -> LockResult<()> {
        self.check_available()?;
        self.inner.keys.lock().unwrap().remove(key);
        Ok(())
    }

    async fn publish(&self, channel: &str, message: &str) -> LockResult<()> {
        self.check_available()?;
        if self.inner.publish_failing.load(Ordering::SeqCst) {
            return Err(LockError::store(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "mock publish failed",
            )));
        }
        self.inner
            .published
            .lock()
            .unwrap()
            .push((channel.to_string(), message.to_string()));
        if let Some(sender) = self.inner.channels.lock().unwrap().get(channel) {
            // No receivers is fine
            let _ = sender.send(message.to_string());
        }
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> LockResult<MockSubscription> {
        self.check_available()?;
        let mut channels = self.inner.channels.lock().unwrap();
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(64).0);
        Ok(MockSubscription {
            messages: sender.subscribe(),
        })
    }
}

#[derive(Debug)]
pub struct MockSubscription {
    messages: broadcast::Receiver<String>,
}

impl NotificationSubscription for MockSubscription {
    async fn next_message(&mut self) -> LockResult<Option<String>> {
        loop {
            match self.messages.recv().await {
                Ok(message) => return Ok(Some(message)),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return Ok(None),
            }
        }
    }

    async fn close(self) -> LockResult<()> {
        Ok(())
    }
}

/// Mock provider for testing provider abstraction.
pub struct MockMutexProvider {
    store: MockStore,
    ttl: Ttl,
}

impl MockMutexProvider {
    pub fn new(ttl: Ttl) -> Self {
        Self {
            store: MockStore::new(),
            ttl,
        }
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }
}

impl MutexProvider for MockMutexProvider {
    type Store = MockStore;

    fn default_ttl(&self) -> Ttl {
        self.ttl
    }

    fn create_mutex_with_ttl(&self, name: &str, ttl: Ttl) -> LockResult<SharedMutex<MockStore>> {
        SharedMutex::new(self.store.clone(), name, ttl)
    }
}
