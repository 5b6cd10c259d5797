//! In-memory registry double.
//!
//! [`InMemoryStore`] models exactly the slice of the store this crate
//! consumes: a change feed. `put` publishes a change notification and
//! `wait` observes changes committed after it was issued. No values are
//! stored. Intended for tests and local development.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::keys::is_under;

use super::{ChangeNotification, WatchClient, WatchError, WatchRequest};

/// Capacity of the change feed channel.
const FEED_CAPACITY: usize = 64;

/// An in-memory change feed standing in for the real registry store.
#[derive(Debug)]
pub struct InMemoryStore {
    feed: broadcast::Sender<ChangeNotification>,
    index: AtomicU64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            feed,
            index: AtomicU64::new(0),
        }
    }

    /// Records a mutation of `key`, waking every outstanding wait.
    ///
    /// Returns the change index assigned to the mutation. Indexes start at
    /// 1 and increase by one per mutation.
    pub fn put(&self, key: &str) -> u64 {
        let index = self.index.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.feed.send(ChangeNotification {
            key: key.to_string(),
            index,
        });
        index
    }

    /// The index of the most recent change, or 0 if nothing was written.
    #[must_use]
    pub fn last_index(&self) -> u64 {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WatchClient for InMemoryStore {
    async fn wait(
        &self,
        request: &WatchRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<ChangeNotification>, WatchError> {
        // Subscribing before the first recv gives "from now" semantics:
        // changes published earlier are never replayed.
        let mut feed = self.feed.subscribe();
        loop {
            tokio::select! {
                () = cancel.cancelled() => return Ok(None),
                received = feed.recv() => match received {
                    Ok(change) => {
                        let matches = if request.recursive {
                            is_under(&request.key, &change.key)
                        } else {
                            change.key == request.key
                        };
                        if matches {
                            return Ok(Some(change));
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => return Ok(None),
                },
            }
        }
    }
}
