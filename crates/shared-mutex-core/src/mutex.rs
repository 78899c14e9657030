//! The shared mutex protocol engine.

use tracing::{debug, instrument, warn, Span};

use crate::error::{LockError, LockResult};
use crate::name::validate_lock_name;
use crate::notification::{Notification, LOCKED_PAYLOAD, UNLOCKED_PAYLOAD};
use crate::state::LockState;
use crate::traits::{MutexStore, NotificationSubscription};
use crate::ttl::Ttl;

/// A distributed mutual-exclusion lock backed by a [`MutexStore`].
///
/// The handle holds no lock state of its own. Every call re-derives or
/// re-asserts the state against the store key named by the identifier, so
/// any number of handles (in any number of processes) for the same
/// identifier stay consistent.
///
/// Acquisition is non-blocking: a held mutex fails fast with
/// [`LockError::AlreadyLocked`] and retrying is up to the caller.
///
/// # Example
///
/// ```rust,ignore
/// let mutex = SharedMutex::new(store, "invoice:42", Ttl::from_millis(30_000)?)?;
///
/// match mutex.acquire().await {
///     Ok(()) => {
///         process_invoice().await;
///         mutex.release().await?;
///     }
///     Err(e) if e.is_already_locked() => { /* someone else is on it */ }
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SharedMutex<S> {
    store: S,
    name: String,
    ttl: Ttl,
}

impl<S: MutexStore> SharedMutex<S> {
    /// Binds a mutex to `name` on `store`.
    ///
    /// Fails with [`LockError::InvalidArgument`] for an empty identifier,
    /// before any store call is made.
    pub fn new(store: S, name: impl Into<String>, ttl: Ttl) -> LockResult<Self> {
        let name = name.into();
        validate_lock_name(&name)?;
        Ok(Self { store, name, ttl })
    }

    /// Returns the identifier, which is also the store key and channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Acquires the mutex.
    ///
    /// On success publishes `locked` on the mutex's channel. If the record
    /// already exists this returns [`LockError::AlreadyLocked`] and publishes
    /// nothing.
    ///
    /// If the record is created but the `locked` publish fails, the record is
    /// deleted again before the error is returned, so a failed acquire never
    /// leaves the mutex held.
    #[instrument(skip(self), fields(mutex.name = %self.name, ttl_ms = ?self.ttl.as_millis(), backend = S::BACKEND, acquired = tracing::field::Empty))]
    pub async fn acquire(&self) -> LockResult<()> {
        if !self.store.set_if_absent(&self.name, self.ttl).await? {
            Span::current().record("acquired", false);
            return Err(LockError::AlreadyLocked {
                name: self.name.clone(),
            });
        }
        Span::current().record("acquired", true);

        // Publish only after the record is committed.
        if let Err(e) = self.store.publish(&self.name, LOCKED_PAYLOAD).await {
            Span::current().record("acquired", false);
            if let Err(rollback) = self.store.delete(&self.name).await {
                warn!(error = %rollback, "could not roll back lock record after failed publish");
            }
            return Err(e);
        }
        debug!("mutex locked");
        Ok(())
    }

    /// Like [`SharedMutex::acquire`], but contention yields `Ok(false)`.
    pub async fn try_acquire(&self) -> LockResult<bool> {
        match self.acquire().await {
            Ok(()) => Ok(true),
            Err(LockError::AlreadyLocked { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Releases the mutex and publishes `unlocked`.
    ///
    /// Releasing a mutex that is not held is not an error, and `unlocked` is
    /// published on every call regardless of whether a record was removed.
    /// There is no ownership check: any handle can release.
    #[instrument(skip(self), fields(mutex.name = %self.name, backend = S::BACKEND))]
    pub async fn release(&self) -> LockResult<()> {
        self.store.delete(&self.name).await?;
        self.store.publish(&self.name, UNLOCKED_PAYLOAD).await?;
        debug!("mutex unlocked");
        Ok(())
    }

    /// Returns whether the lock record currently exists.
    ///
    /// Advisory only; the answer can be stale as soon as it is returned.
    /// Never use it in place of [`SharedMutex::acquire`].
    pub async fn is_locked(&self) -> LockResult<bool> {
        Ok(self.state().await?.is_locked())
    }

    /// Queries the live [`LockState`] of this mutex.
    #[instrument(skip(self), fields(mutex.name = %self.name, backend = S::BACKEND, state = tracing::field::Empty))]
    pub async fn state(&self) -> LockResult<LockState> {
        let state = LockState::from(self.store.exists(&self.name).await?);
        Span::current().record("state", tracing::field::display(state));
        Ok(state)
    }

    /// Subscribes to this mutex's lock/unlock notifications.
    ///
    /// Only transitions published after this returns are delivered.
    #[instrument(skip(self), fields(mutex.name = %self.name, backend = S::BACKEND))]
    pub async fn subscribe(&self) -> LockResult<NotificationStream<S::Subscription>> {
        let subscription = self.store.subscribe(&self.name).await?;
        Ok(NotificationStream { subscription })
    }
}

/// Typed stream of [`Notification`]s for one mutex.
#[derive(Debug)]
pub struct NotificationStream<T> {
    subscription: T,
}

impl<T: NotificationSubscription> NotificationStream<T> {
    /// Waits for the next notification, or `None` once closed.
    pub async fn next(&mut self) -> LockResult<Option<Notification>> {
        Ok(self
            .subscription
            .next_message()
            .await?
            .map(Notification::from))
    }

    /// Unsubscribes and closes the underlying connection.
    pub async fn close(self) -> LockResult<()> {
        self.subscription.close().await
    }

    pub fn into_inner(self) -> T {
        self.subscription
    }
}
