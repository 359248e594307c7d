pub mod handlers;
mod host;
mod player;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::Role;
use handlers::Session;

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub role: Option<String>,
    /// Required with `role=host`
    pub token: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request: role={:?}", params.role);

    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut session = match params.role.as_deref() {
        Some("host") => {
            if !state.is_host_token(params.token.as_deref()) {
                tracing::warn!("Rejected host connection with a missing or wrong token");
                let error = ServerMessage::Error {
                    code: "UNAUTHORIZED".to_string(),
                    msg: "Invalid host token".to_string(),
                };
                if let Ok(json) = serde_json::to_string(&error) {
                    let _ = sender.send(Message::Text(json.into())).await;
                }
                let _ = sender.send(Message::Close(None)).await;
                return;
            }
            let host_id = format!("host-{}", ulid::Ulid::new());
            state.register_host(&host_id).await;
            Session::host(host_id)
        }
        _ => Session::player(),
    };

    tracing::info!("WebSocket connected with role: {:?}", session.role);

    // Subscribe before the welcome snapshot so nothing falls in between
    let mut broadcast_rx = state.subscribe();

    let welcome = ServerMessage::Welcome {
        protocol: PROTOCOL_VERSION.to_string(),
        role: session.role.clone(),
        snapshot: Box::new(state.snapshot().await),
    };

    if let Ok(msg) = serde_json::to_string(&welcome) {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            tracing::error!("Failed to send welcome message");
            disconnect(&state, &session).await;
            return;
        }
    }

    // Handle incoming messages and broadcasts
    loop {
        tokio::select! {
            broadcast_msg = broadcast_rx.recv() => {
                let msg = match broadcast_msg {
                    Ok(msg) => msg,
                    Err(RecvError::Lagged(skipped)) => {
                        // Too far behind to replay; resync from a snapshot
                        tracing::warn!("Client lagged by {} messages, sending snapshot", skipped);
                        ServerMessage::Snapshot {
                            snapshot: Box::new(state.snapshot().await),
                        }
                    }
                    Err(RecvError::Closed) => break,
                };
                if let Ok(json) = serde_json::to_string(&msg) {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
            }

            // Handle client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                if let Some(response) =
                                    handlers::handle_message(client_msg, &mut session, &state).await
                                {
                                    if let Ok(json) = serde_json::to_string(&response) {
                                        if sender.send(Message::Text(json.into())).await.is_err() {
                                            tracing::error!("Failed to send response");
                                            break;
                                        }
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::error!("Failed to parse client message: {}", e);
                                let error = ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("Invalid message format: {}", e),
                                };
                                if let Ok(json) = serde_json::to_string(&error) {
                                    let _ = sender.send(Message::Text(json.into())).await;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    disconnect(&state, &session).await;
    tracing::info!("WebSocket connection closed for role: {:?}", session.role);
}

async fn disconnect(state: &Arc<AppState>, session: &Session) {
    match (&session.role, &session.player_id) {
        (Role::Host, Some(host_id)) => {
            state.host_disconnected(host_id).await;
        }
        (Role::Player, Some(player_id)) => state.player_disconnected(player_id).await,
        _ => {}
    }
}
