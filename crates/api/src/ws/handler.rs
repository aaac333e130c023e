use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::StreamExt;
use pulse_events::HubHandle;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;
use crate::ws::transport::WsTransport;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub, state.shutdown))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers a subscriber, spawns its delivery routine over the socket's
/// sink and reads the stream until the peer closes, the delivery routine
/// ends (eviction or write failure) or the server shuts down.
async fn handle_socket(socket: WebSocket, hub: HubHandle, shutdown: CancellationToken) {
    let mailbox = match hub.subscribe() {
        Ok(mailbox) => mailbox,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting WebSocket: hub unavailable");
            return;
        }
    };
    let id = mailbox.id();
    tracing::info!(subscriber_id = %id, "WebSocket connected");

    let (sink, mut stream) = socket.split();
    let mut delivery = tokio::spawn(mailbox.deliver(WsTransport::new(sink), hub.clone()));

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = &mut delivery => break,
            frame = stream.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {
                    // Inbound messages carry no meaning.
                }
                Some(Err(e)) => {
                    tracing::debug!(subscriber_id = %id, error = %e, "WebSocket receive error");
                    break;
                }
            },
        }
    }

    hub.unregister(id);
    delivery.abort();
    tracing::info!(subscriber_id = %id, "WebSocket disconnected");
}
