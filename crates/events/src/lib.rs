//! Fan-out of serialized status messages to live subscribers.
//!
//! - [`hub`]: the dispatch loop and the [`HubHandle`] used to talk to it.
//! - [`subscriber`]: per-connection mailboxes and their delivery routine.
//! - [`transport`]: the outbound seam a delivery routine writes to.

pub mod hub;
pub mod subscriber;
pub mod transport;

pub use hub::{BroadcastHub, HubClosed, HubHandle, HubStats, DEFAULT_MAILBOX_CAPACITY};
pub use subscriber::{Mailbox, Subscriber, SubscriberId};
pub use transport::{Transport, TransportError};
