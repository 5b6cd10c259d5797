//! The registry event stream.
//!
//! [`RegistryEventStream`] owns the long-lived watch loop that turns store
//! change notifications into [`JobEvent`]s. Each [`EventStream::next`] call
//! arms one background loop which delivers at most one event and then
//! stops; callers re-arm for each subsequent event.
//!
//! The loop never gives up on transient store failures. Every round trip
//! to the store, successful or not, pushes a shared pacing gate forward so
//! the stream issues at most one watch request per configured pause
//! interval. A found event is delivered immediately; the pause is charged
//! to the next request, not to the delivery.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::event::{classify, JobEvent};
use crate::keys::KeyScope;
use crate::store::{WatchClient, WatchRequest};

/// Default pause between consecutive watch requests.
pub const DEFAULT_WATCH_PAUSE: Duration = Duration::from_secs(1);

/// Default registry root prefix.
pub const DEFAULT_ROOT_PREFIX: &str = "/convoy";

/// Configuration for a registry event stream.
#[derive(Debug, Clone)]
pub struct EventStreamConfig {
    /// Root prefix of the registry key space; the stream watches the `job`
    /// subtree underneath it.
    pub root_prefix: String,
    /// Minimum spacing between consecutive watch requests to the store.
    pub pause: Duration,
}

impl Default for EventStreamConfig {
    fn default() -> Self {
        Self {
            root_prefix: DEFAULT_ROOT_PREFIX.into(),
            pause: DEFAULT_WATCH_PAUSE,
        }
    }
}

/// Producer of job events.
///
/// The one seam the scheduler consumes: ask for the next event of
/// interest, get back a handle that eventually holds exactly one event, or
/// closes empty if the token is cancelled first.
pub trait EventStream: Send + Sync {
    /// Arms a watch for the next job event.
    ///
    /// Returns immediately with the receiving half of a single-value
    /// channel. The channel yields exactly one [`JobEvent`] once a
    /// qualifying change is observed, or closes without a value when
    /// `cancel` fires first. Cancellation wins races: once the token is
    /// cancelled, no further store requests are issued and nothing is
    /// delivered, even for a change already in flight.
    fn next(&self, cancel: &CancellationToken) -> oneshot::Receiver<JobEvent>;
}

/// Everything one armed watch loop needs, moved into its task.
struct WatchContext {
    client: Arc<dyn WatchClient>,
    scope: KeyScope,
    pause: Duration,
    gate: Arc<Mutex<Option<Instant>>>,
    cancel: CancellationToken,
}

/// [`EventStream`] implementation backed by a [`WatchClient`].
///
/// Invocations share the pacing gate, so overlapping watches on one stream
/// collectively respect the request spacing. `next` spawns its loop onto
/// the ambient Tokio runtime.
pub struct RegistryEventStream {
    client: Arc<dyn WatchClient>,
    scope: KeyScope,
    pause: Duration,
    gate: Arc<Mutex<Option<Instant>>>,
}

impl fmt::Debug for RegistryEventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEventStream")
            .field("scope", &self.scope)
            .field("pause", &self.pause)
            .finish_non_exhaustive()
    }
}

impl RegistryEventStream {
    /// Creates a stream over `client` with the given configuration.
    #[must_use]
    pub fn new(client: Arc<dyn WatchClient>, config: EventStreamConfig) -> Self {
        Self {
            client,
            scope: KeyScope::new(&config.root_prefix),
            pause: config.pause,
            gate: Arc::new(Mutex::new(None)),
        }
    }

    /// The job subtree scope this stream watches.
    #[must_use]
    pub fn scope(&self) -> &KeyScope {
        &self.scope
    }

    /// Runs one armed watch until it delivers or observes cancellation.
    async fn run_watch(ctx: WatchContext, result: oneshot::Sender<JobEvent>) {
        let request = WatchRequest {
            key: ctx.scope.job_subtree().to_string(),
            recursive: true,
        };
        debug!(subtree = %request.key, "watching for job events");

        loop {
            if ctx.cancel.is_cancelled() {
                break;
            }
            if !Self::wait_for_gate(&ctx).await {
                break;
            }

            let outcome = ctx.client.wait(&request, &ctx.cancel).await;
            Self::push_gate(&ctx);

            match outcome {
                Err(e) => {
                    warn!(error = %e, subtree = %request.key, "watch request failed, retrying");
                }
                Ok(change) => {
                    if ctx.cancel.is_cancelled() {
                        break;
                    }
                    if let Some(event) = classify(change.as_ref(), &ctx.scope) {
                        debug!(event = %event, "delivering job event");
                        let _ = result.send(event);
                        return;
                    }
                }
            }
        }

        debug!(subtree = %request.key, "watch cancelled before an event was found");
    }

    /// Waits out the pacing gate. Returns `false` if cancelled meanwhile.
    async fn wait_for_gate(ctx: &WatchContext) -> bool {
        let Some(wake_at) = *ctx.gate.lock() else {
            return true;
        };
        if wake_at <= Instant::now() {
            return true;
        }
        tokio::select! {
            () = tokio::time::sleep_until(wake_at) => true,
            () = ctx.cancel.cancelled() => false,
        }
    }

    /// Pushes the pacing gate one pause past now.
    fn push_gate(ctx: &WatchContext) {
        *ctx.gate.lock() = Some(Instant::now() + ctx.pause);
    }
}

impl EventStream for RegistryEventStream {
    fn next(&self, cancel: &CancellationToken) -> oneshot::Receiver<JobEvent> {
        let (tx, rx) = oneshot::channel();
        let ctx = WatchContext {
            client: Arc::clone(&self.client),
            scope: self.scope.clone(),
            pause: self.pause,
            gate: Arc::clone(&self.gate),
            cancel: cancel.clone(),
        };
        tokio::spawn(Self::run_watch(ctx, tx));
        rx
    }
}
