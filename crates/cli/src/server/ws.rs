//! WebSocket channel pushing reload notifications.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::routes::ServerState;
use super::watcher::ReloadMessage;

/// Handler for WebSocket upgrade at GET /__element/ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>) {
    debug!("Reload client connected");
    let mut reloads = state.subscribe();
    let mut closing = state.closing();

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Reload client disconnected");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                }
            }

            msg = reloads.recv() => {
                match msg {
                    Ok(reload) => {
                        if let Err(e) = send_reload(&mut socket, &reload).await {
                            warn!("Failed to send reload: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Reload client lagged, missed {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            _ = closing.changed() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }
}

async fn send_reload(
    socket: &mut WebSocket,
    reload: &ReloadMessage,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = serde_json::to_string(reload)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}
