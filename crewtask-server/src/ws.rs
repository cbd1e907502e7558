//! Real-time WebSocket channel.
//!
//! Clients connect to `/ws?token=<jwt>`; the token is verified *before* the
//! protocol upgrade, so an invalid credential is refused with 401 and no
//! socket is ever established. The channel is push-only: the server sends
//! JSON-encoded [`crewtask_proto::event::ServerEvent`] frames and ignores
//! everything a client sends except close frames.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::auth::{self, AuthUser};
use crate::error::ApiError;
use crate::server::AppState;

/// Query parameters for the WebSocket endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WsQuery {
    /// Bearer token, passed as a query parameter because browser WebSocket
    /// clients cannot set an `Authorization` header. Clients that can set
    /// headers may send `Authorization: Bearer` instead.
    pub token: Option<String>,
}

/// Upgrades `/ws` requests, authenticating first.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = query
        .token
        .as_deref()
        .or_else(|| auth::bearer_token(&headers))
        .ok_or_else(|| ApiError::authentication("missing bearer token"))?;
    let user = state.auth.verify(token)?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

/// Handles one authenticated connection.
///
/// The connection lifecycle:
/// 1. Bind the connection into the registry under the verified identity.
/// 2. Spawn a writer task draining the registry channel into the socket.
/// 3. Read from the socket until a close frame or error (inbound frames
///    carry no protocol meaning and are dropped).
/// 4. Release the binding so fan-out stops addressing this connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user: AuthUser) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let conn_id = state
        .registry
        .bind(user.id.clone(), user.role, tx)
        .await;
    tracing::info!(user_id = %user.id, conn_id = %conn_id, "connection bound");

    // Writer: forward queued pushes to the socket.
    let writer_user = user.id.clone();
    let mut write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                tracing::debug!(user_id = %writer_user, "WebSocket write failed");
                break;
            }
        }
    });

    // Reader: the channel is push-only, so we only care about liveness.
    let reader_user = user.id.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                Message::Close(_) => {
                    tracing::debug!(user_id = %reader_user, "received close frame");
                    break;
                }
                _ => {
                    // Ignore text, binary, ping, pong frames.
                }
            }
        }
    });

    // Wait for either task to finish, then abort the other.
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
        }
        _ = &mut write_task => {
            read_task.abort();
        }
    }

    state.registry.release(conn_id).await;
    tracing::info!(user_id = %user.id, conn_id = %conn_id, "connection released");
}
