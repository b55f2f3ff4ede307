use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::{AppState, RuntimeEvent};

pub async fn events_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

/// Pushes every runtime event to one dashboard until either side goes away.
/// Inbound frames other than close are ignored; launching goes through HTTP.
async fn stream_events(mut socket: WebSocket, state: AppState) {
    let mut events = state.subscribe_events();
    debug!("dashboard connected");

    let connected = RuntimeEvent::connected(state.active_run_id());
    if send_event(&mut socket, &connected).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "dashboard lagged behind event stream");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    debug!("dashboard disconnected");
}

#[derive(Debug)]
enum SendError {
    Encode,
    Socket,
}

async fn send_event(socket: &mut WebSocket, event: &RuntimeEvent) -> Result<(), SendError> {
    let payload = serde_json::to_string(event).map_err(|err| {
        warn!(%err, "failed to encode runtime event");
        SendError::Encode
    })?;
    socket
        .send(Message::Text(payload))
        .await
        .map_err(|_| SendError::Socket)
}
