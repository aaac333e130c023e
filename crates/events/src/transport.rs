use async_trait::async_trait;
use bytes::Bytes;

/// A write to the external connection failed; the subscriber is gone.
#[derive(Debug, thiserror::Error)]
#[error("transport write failed: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(reason: impl std::fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

/// Outbound side of one subscriber's connection (e.g. a WebSocket sink).
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, message: Bytes) -> Result<(), TransportError>;

    /// Called once after the mailbox closes or a write fails.
    async fn close(&mut self) {}
}
