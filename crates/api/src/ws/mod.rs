//! WebSocket subscribers.
//!
//! Each upgraded connection becomes one broadcast hub subscriber: its
//! mailbox is drained into the socket by [`WsTransport`] while the inbound
//! half is watched for Close frames and errors.

mod handler;
mod transport;

pub use handler::ws_handler;
pub use transport::{to_frame, WsTransport};
