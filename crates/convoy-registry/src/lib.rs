//! # Convoy Registry
//!
//! The event layer between Convoy's strongly-consistent key-value registry
//! and its job scheduler. Raw change notifications from the store are
//! classified into a small vocabulary of typed [`JobEvent`]s and delivered
//! through a cancellable, rate-limited watch loop.
//!
//! ## Components
//!
//! - [`classify`]: pure mapping from one change notification to at most one
//!   job event, scoped to the registry's job subtree
//! - [`RegistryEventStream`]: arms a background watch loop per
//!   [`EventStream::next`] call; each loop delivers at most one event,
//!   retries transient store failures forever, and paces its requests
//! - [`WatchClient`]: the narrow store-facing seam, with an in-memory
//!   double ([`InMemoryStore`]) and a scripted mock
//!   ([`testing::MockWatchClient`])

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod event;
pub mod keys;
pub mod store;
pub mod stream;
pub mod testing;

pub use event::{classify, JobEvent};
pub use keys::KeyScope;
pub use store::{ChangeNotification, InMemoryStore, WatchClient, WatchError, WatchRequest};
pub use stream::{
    EventStream, EventStreamConfig, RegistryEventStream, DEFAULT_ROOT_PREFIX, DEFAULT_WATCH_PAUSE,
};
