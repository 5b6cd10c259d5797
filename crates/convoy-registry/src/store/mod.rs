//! Store-facing watch contract.
//!
//! Convoy rides on an external strongly-consistent key-value store. This
//! module defines the narrow slice of that store's API the event layer
//! consumes: a cancellable "wait for the next change under a key"
//! primitive, plus the notification and error types it traffics in.
//! Connection management, TLS, and leader discovery belong to the concrete
//! client behind the trait.

mod memory;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// A request to observe changes under a registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRequest {
    /// The key (or subtree root) to observe.
    pub key: String,
    /// When `true`, changes anywhere below `key` are reported; otherwise
    /// only changes to `key` itself.
    pub recursive: bool,
}

/// One observed mutation of the registry.
///
/// Carries the full path of the changed key and the store's change index.
/// The index increases monotonically per store; the event layer carries it
/// for diagnostics but does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// Full path of the key that changed.
    pub key: String,
    /// The store's index for this change.
    pub index: u64,
}

/// Errors a watch call can fail with.
///
/// Every variant is transient: callers are expected to retry after a pause
/// rather than give up.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The store did not answer within its deadline.
    #[error("watch timed out: {0}")]
    Timeout(String),

    /// The connection to the store dropped mid-request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store is reachable but cannot serve watches right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Client-side watch primitive of the backing key-value store.
///
/// Implementations wrap a concrete store client (or a test double) and
/// expose the single blocking operation the event layer needs. The store
/// connection must tolerate concurrent `wait` calls from overlapping
/// watches; no exclusive lock is taken here.
#[async_trait]
pub trait WatchClient: Send + Sync {
    /// Blocks until a change occurs under the requested key, the token is
    /// cancelled, or a transient error occurs.
    ///
    /// Returns `Ok(Some(..))` with the observed change, or `Ok(None)` when
    /// the wait unblocked with nothing to report (cancellation, or a
    /// spurious wake on the store's side). Only changes committed after the
    /// call was issued are reported; there is no historical replay.
    ///
    /// # Errors
    ///
    /// Returns a [`WatchError`] on transient backend failure. All watch
    /// errors are retryable.
    async fn wait(
        &self,
        request: &WatchRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<ChangeNotification>, WatchError>;
}
