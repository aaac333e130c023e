//! Single-writer broadcast hub.
//!
//! [`BroadcastHub::run`] is the only code that touches the subscriber set.
//! Callers interact through a cloneable [`HubHandle`] which forwards
//! register, unregister and publish events over one FIFO channel, so the
//! loop applies them in the order they were sent. Fan-out uses `try_send`
//! into each subscriber's bounded mailbox: a full mailbox evicts that
//! subscriber instead of slowing everyone else down.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::subscriber::{Mailbox, Subscriber, SubscriberId};

/// Default number of undelivered messages a subscriber may hold before it
/// is evicted.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Publishes that may wait on the dispatch loop before `publish` suspends.
const PUBLISH_BUFFER: usize = 1024;

/// The dispatch loop has exited; no further events are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("broadcast hub is no longer running")]
pub struct HubClosed;

/// One mutation of the hub, applied by the dispatch loop in arrival order.
#[derive(Debug)]
enum HubEvent {
    Register(Subscriber),
    Unregister(SubscriberId),
    /// The permit is released once the message has been fanned out.
    Publish(Bytes, OwnedSemaphorePermit),
}

/// Hub counters, readable from any handle.
#[derive(Debug, Default)]
struct Counters {
    subscribers: AtomicUsize,
    published: AtomicU64,
    evicted: AtomicU64,
}

/// Snapshot of hub activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub subscribers: usize,
    pub published: u64,
    pub evicted: u64,
}

/// Owns the live subscriber set and the receiving end of the event
/// channel. Construct with [`new`](Self::new), take a
/// [`handle`](Self::handle), then spawn [`run`](Self::run).
pub struct BroadcastHub {
    subscribers: HashMap<SubscriberId, Subscriber>,
    events_rx: mpsc::UnboundedReceiver<HubEvent>,
    handle: HubHandle,
}

impl BroadcastHub {
    /// Create an empty hub whose subscribers get the default mailbox size.
    pub fn new() -> Self {
        Self::with_mailbox_capacity(DEFAULT_MAILBOX_CAPACITY)
    }

    /// Create an empty hub with a custom per-subscriber mailbox capacity.
    ///
    /// # Panics
    ///
    /// Panics if `mailbox_capacity` is zero.
    pub fn with_mailbox_capacity(mailbox_capacity: usize) -> Self {
        assert!(mailbox_capacity > 0, "mailbox capacity must be non-zero");

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let handle = HubHandle {
            events_tx,
            publish_permits: Arc::new(Semaphore::new(PUBLISH_BUFFER)),
            mailbox_capacity,
            next_id: Arc::new(AtomicU64::new(1)),
            counters: Arc::new(Counters::default()),
        };

        Self {
            subscribers: HashMap::new(),
            events_rx,
            handle,
        }
    }

    /// A handle for registering subscribers and publishing messages.
    pub fn handle(&self) -> HubHandle {
        self.handle.clone()
    }

    /// Run the dispatch loop until every [`HubHandle`] has been dropped.
    ///
    /// Events are applied strictly in send order. A publish that returned
    /// before an unregister was sent still reaches that subscriber.
    pub async fn run(self) {
        let Self {
            mut subscribers,
            mut events_rx,
            handle,
        } = self;
        let counters = Arc::clone(&handle.counters);
        let publish_permits = Arc::clone(&handle.publish_permits);
        // Only external handles may keep the loop alive.
        drop(handle);

        tracing::info!("Broadcast hub started");

        while let Some(event) = events_rx.recv().await {
            match event {
                HubEvent::Register(subscriber) => {
                    tracing::debug!(subscriber_id = %subscriber.id(), "Subscriber registered");
                    subscribers.insert(subscriber.id(), subscriber);
                }
                HubEvent::Unregister(id) => {
                    // Dropping the subscriber closes its mailbox.
                    if subscribers.remove(&id).is_some() {
                        tracing::debug!(subscriber_id = %id, "Subscriber unregistered");
                    }
                }
                HubEvent::Publish(message, _permit) => {
                    fan_out(&mut subscribers, &message, &counters);
                    counters.published.fetch_add(1, Ordering::Relaxed);
                }
            }
            counters
                .subscribers
                .store(subscribers.len(), Ordering::Relaxed);
        }

        // Wake publishers still waiting for buffer space.
        publish_permits.close();
        counters.subscribers.store(0, Ordering::Relaxed);
        tracing::info!("Broadcast hub stopped");
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Deliver `message` to every live subscriber without waiting.
fn fan_out(
    subscribers: &mut HashMap<SubscriberId, Subscriber>,
    message: &Bytes,
    counters: &Counters,
) {
    subscribers.retain(|id, subscriber| match subscriber.try_send(message.clone()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            counters.evicted.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(subscriber_id = %id, "Subscriber mailbox full; evicting");
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(subscriber_id = %id, "Subscriber mailbox closed; removing");
            false
        }
    });
}

/// Cloneable front door to a running [`BroadcastHub`].
#[derive(Clone)]
pub struct HubHandle {
    events_tx: mpsc::UnboundedSender<HubEvent>,
    publish_permits: Arc<Semaphore>,
    mailbox_capacity: usize,
    next_id: Arc<AtomicU64>,
    counters: Arc<Counters>,
}

impl HubHandle {
    /// Create a mailbox for a new connection and register it.
    ///
    /// The returned [`Mailbox`] is the receiving half; attach a delivery
    /// routine with [`Mailbox::deliver`].
    pub fn subscribe(&self) -> Result<Mailbox, HubClosed> {
        let id = SubscriberId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (subscriber, mailbox) = Subscriber::pair(id, self.mailbox_capacity);
        self.register(subscriber)?;
        Ok(mailbox)
    }

    /// Add a subscriber to the live set once the dispatch loop processes
    /// the event.
    pub fn register(&self, subscriber: Subscriber) -> Result<(), HubClosed> {
        self.events_tx
            .send(HubEvent::Register(subscriber))
            .map_err(|_| HubClosed)
    }

    /// Remove a subscriber and close its mailbox. Unknown ids are ignored.
    pub fn unregister(&self, id: SubscriberId) {
        // A stopped hub has already dropped every mailbox.
        let _ = self.events_tx.send(HubEvent::Unregister(id));
    }

    /// Queue a message for fan-out to every live subscriber.
    ///
    /// Waits only while the hub's own publish buffer is full.
    pub async fn publish(&self, message: impl Into<Bytes>) -> Result<(), HubClosed> {
        let permit = Arc::clone(&self.publish_permits)
            .acquire_owned()
            .await
            .map_err(|_| HubClosed)?;
        self.events_tx
            .send(HubEvent::Publish(message.into(), permit))
            .map_err(|_| HubClosed)
    }

    pub fn mailbox_capacity(&self) -> usize {
        self.mailbox_capacity
    }

    /// Number of live subscribers as of the last processed event.
    pub fn subscriber_count(&self) -> usize {
        self.counters.subscribers.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            subscribers: self.subscriber_count(),
            published: self.counters.published.load(Ordering::Relaxed),
            evicted: self.counters.evicted.load(Ordering::Relaxed),
        }
    }
}
