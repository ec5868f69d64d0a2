use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::types::{ClientMessage, ServerMessage};
use crate::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = Uuid::new_v4();
    info!("WebSocket client connected: {}", client_id);

    // All frames for this client go through one channel
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Subscribe before the snapshot so no update is lost in between
    let mut updates = state.engine.subscribe();
    send_message(
        &tx,
        &ServerMessage::Snapshot {
            data: Box::new(state.engine.snapshot()),
        },
    );

    let forward_tx = tx.clone();
    let forward_task = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    if !send_message(&forward_tx, &ServerMessage::Update { data: update }) {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("WebSocket client {} lagged, skipped {} updates", client_id, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!("Received message from {}: {}", client_id, text);
                handle_message(&state, &tx, &text).await;
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket client disconnecting: {}", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                debug!("Received ping from {}", client_id);
            }
            Err(e) => {
                error!("WebSocket error for {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    forward_task.abort();
    send_task.abort();
    info!("WebSocket client disconnected: {}", client_id);
}

/// Apply one client frame and return the reply, if any.
pub async fn dispatch(state: &AppState, text: &str) -> Option<ServerMessage> {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            return Some(ServerMessage::Error {
                error: format!("Invalid message: {}", e),
            })
        }
    };

    match msg {
        ClientMessage::SetConfig { update } => {
            // The resulting config frame arrives through the update stream
            state.engine.apply_config(&update).await;
            None
        }
        ClientMessage::ToggleSymbol { symbol, checked } => {
            if state.engine.toggle_symbol(&symbol, checked).await {
                None
            } else {
                Some(ServerMessage::Error {
                    error: format!("Symbol selection unchanged: {}", symbol),
                })
            }
        }
        ClientMessage::DismissAlert { id } => {
            let removed = state.engine.dismiss_alert(&id);
            Some(ServerMessage::AlertDismissed { id, removed })
        }
        ClientMessage::RequestDetails { kind } => Some(ServerMessage::Details {
            data: state.engine.request_details(kind),
        }),
    }
}

async fn handle_message(state: &AppState, tx: &mpsc::UnboundedSender<String>, text: &str) {
    if let Some(reply) = dispatch(state, text).await {
        send_message(tx, &reply);
    }
}

fn send_message(tx: &mpsc::UnboundedSender<String>, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => tx.send(json).is_ok(),
        Err(e) => {
            error!("Failed to encode server message: {}", e);
            true
        }
    }
}
