//! Redis pub/sub subscription for mutex notifications.

use std::fmt;

use fred::interfaces::EventInterface;
use fred::prelude::*;
use fred::types::Message;
use shared_mutex_core::error::LockResult;
use shared_mutex_core::traits::NotificationSubscription;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, warn};

use crate::store::store_error;

/// A subscription to one channel on a dedicated Redis connection.
///
/// Call [`NotificationSubscription::close`] to unsubscribe. Dropping the
/// subscription instead quits the connection in the background.
pub struct RedisSubscription {
    /// Subscriber-mode client, separate from the command client.
    client: RedisClient,
    channel: String,
    messages: Receiver<Message>,
    closed: bool,
}

impl RedisSubscription {
    /// Opens a new connection modelled on `client` and subscribes to `channel`.
    pub(crate) async fn open(client: &RedisClient, channel: &str) -> LockResult<Self> {
        let subscriber = client.clone_new();
        subscriber.connect();
        subscriber
            .wait_for_connect()
            .await
            .map_err(store_error("connect (subscriber)"))?;

        // Take the receiver first so nothing published after SUBSCRIBE is missed.
        let messages = subscriber.message_rx();
        if let Err(e) = subscriber.subscribe(channel).await {
            let _ = subscriber.quit().await;
            return Err(store_error("SUBSCRIBE")(e));
        }
        debug!(channel, "subscribed");

        Ok(Self {
            client: subscriber,
            channel: channel.to_string(),
            messages,
            closed: false,
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl fmt::Debug for RedisSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSubscription")
            .field("channel", &self.channel)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl NotificationSubscription for RedisSubscription {
    async fn next_message(&mut self) -> LockResult<Option<String>> {
        loop {
            match self.messages.recv().await {
                Ok(message) => {
                    if &*message.channel != self.channel.as_str() {
                        continue;
                    }
                    match message.value.as_string() {
                        Some(payload) => return Ok(Some(payload)),
                        None => warn!(channel = %self.channel, "ignoring non-string pub/sub payload"),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(channel = %self.channel, skipped, "subscriber lagged, messages dropped");
                }
                Err(RecvError::Closed) => return Ok(None),
            }
        }
    }

    async fn close(mut self) -> LockResult<()> {
        self.client
            .unsubscribe(self.channel.as_str())
            .await
            .map_err(store_error("UNSUBSCRIBE"))?;
        self.client.quit().await.map_err(store_error("QUIT"))?;
        self.closed = true;
        Ok(())
    }
}

impl Drop for RedisSubscription {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        // No async in Drop; quit on the current runtime if there is one.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let client = self.client.clone();
            runtime.spawn(async move {
                let _ = client.quit().await;
            });
        }
    }
}
