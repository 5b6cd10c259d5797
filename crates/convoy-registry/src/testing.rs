//! Test doubles for the store seam.
//!
//! [`MockWatchClient`] replays a scripted sequence of watch outcomes,
//! letting tests drive the event stream through error, non-match, and
//! match paths without a real store. Used by this crate's own tests and
//! available to downstream crates for theirs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::store::{ChangeNotification, WatchClient, WatchError, WatchRequest};

/// One scripted outcome of a [`MockWatchClient`] wait call.
pub type ScriptedWait = Result<Option<ChangeNotification>, WatchError>;

/// Scripted [`WatchClient`] for tests.
///
/// `wait` pops outcomes front to back; once the script is exhausted, calls
/// pend until the cancellation token fires and then return `Ok(None)`.
#[derive(Debug, Default)]
pub struct MockWatchClient {
    script: Mutex<VecDeque<ScriptedWait>>,
    calls: AtomicUsize,
}

impl MockWatchClient {
    /// Creates a mock that replays `script` in order.
    #[must_use]
    pub fn new(script: Vec<ScriptedWait>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Appends one outcome to the script.
    pub fn push(&self, outcome: ScriptedWait) {
        self.script.lock().push_back(outcome);
    }

    /// Number of wait calls observed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WatchClient for MockWatchClient {
    async fn wait(
        &self,
        _request: &WatchRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<ChangeNotification>, WatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some(outcome) => outcome,
            None => {
                cancel.cancelled().await;
                Ok(None)
            }
        }
    }
}
