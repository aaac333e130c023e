use std::fmt::Display;

use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes};
use bytes::Bytes;
use futures::{Sink, SinkExt};
use pulse_events::{Transport, TransportError};

/// Writes hub messages to the outbound half of a WebSocket.
pub struct WsTransport<S> {
    sink: S,
}

impl<S> WsTransport<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl<S> Transport for WsTransport<S>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display,
{
    async fn send(&mut self, message: Bytes) -> Result<(), TransportError> {
        self.sink
            .send(to_frame(message))
            .await
            .map_err(TransportError::new)
    }

    async fn close(&mut self) {
        // The peer may already be gone.
        let _ = self.sink.close().await;
    }
}

/// UTF-8 payloads go out as text frames, anything else as binary.
///
/// Both arms share the hub's buffer; no per-subscriber copy is made.
pub fn to_frame(message: Bytes) -> Message {
    match Utf8Bytes::try_from(message.clone()) {
        Ok(text) => Message::Text(text),
        Err(_) => Message::Binary(message),
    }
}
