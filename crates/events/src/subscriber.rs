//! Subscriber mailboxes.
//!
//! A mailbox is a bounded `mpsc` channel. The hub keeps the sending half
//! ([`Subscriber`]); the connection keeps the receiving half ([`Mailbox`])
//! and drains it with [`Mailbox::deliver`]. Dropping the [`Subscriber`]
//! closes the mailbox, which ends the delivery routine.

use std::fmt;

use bytes::Bytes;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::hub::HubHandle;
use crate::transport::Transport;

/// Opaque identifier of one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// The hub's half of a mailbox.
#[derive(Debug)]
pub struct Subscriber {
    id: SubscriberId,
    mailbox: mpsc::Sender<Bytes>,
}

impl Subscriber {
    /// Create a connected subscriber/mailbox pair.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn pair(id: SubscriberId, capacity: usize) -> (Self, Mailbox) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { id, mailbox: tx }, Mailbox { id, rx })
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub(crate) fn try_send(&self, message: Bytes) -> Result<(), TrySendError<Bytes>> {
        self.mailbox.try_send(message)
    }
}

/// The connection's half of a mailbox.
#[derive(Debug)]
pub struct Mailbox {
    id: SubscriberId,
    rx: mpsc::Receiver<Bytes>,
}

impl Mailbox {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next message in publish order, or `None` once the hub has closed the
    /// mailbox and every buffered message has been read.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Forward every message to `transport` until the mailbox closes.
    ///
    /// On a write failure the subscriber unregisters itself from the hub
    /// and the routine returns. The transport is closed in both cases.
    pub async fn deliver<T: Transport>(mut self, mut transport: T, hub: HubHandle) {
        let id = self.id;

        while let Some(message) = self.rx.recv().await {
            if let Err(e) = transport.send(message).await {
                tracing::debug!(subscriber_id = %id, error = %e, "Transport write failed");
                hub.unregister(id);
                break;
            }
        }

        transport.close().await;
        tracing::debug!(subscriber_id = %id, "Delivery routine finished");
    }
}
