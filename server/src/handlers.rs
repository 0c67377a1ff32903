use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::logic::{broadcast_except, validate_frame};
use crate::rooms::{join_room, leave_room};
use crate::state::AppState;

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection_id = Uuid::new_v4();
    let room_name = state.room_name.clone();

    let (room, peers) = join_room(&state, &room_name, connection_id, tx).await;
    info!(room = %room_name, conn = %connection_id, peers, "WS connected");

    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if socket_sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    let mut close_frame = None;

    while let Some(message) = socket_receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match validate_frame(&text) {
                Ok(_) => {
                    let delivered = broadcast_except(&room, connection_id, &text).await;
                    debug!(room = %room_name, conn = %connection_id, delivered, "relayed draw");
                }
                Err(error) => {
                    warn!(room = %room_name, conn = %connection_id, %error, "dropping invalid frame");
                }
            },
            Ok(Message::Binary(data)) => {
                debug!(conn = %connection_id, bytes = data.len(), "ignoring binary frame");
            }
            Ok(Message::Close(frame)) => {
                close_frame = frame;
                break;
            }
            Ok(_) => {}
            Err(error) => {
                warn!(conn = %connection_id, %error, "WS receive failed");
                break;
            }
        }
    }

    let peers = leave_room(&state, &room_name, &room, &connection_id).await;
    send_task.abort();
    info!(room = %room_name, conn = %connection_id, peers, "WS disconnected");
    if let Some(frame) = &close_frame {
        debug!(
            conn = %connection_id,
            code = frame.code,
            reason = %frame.reason,
            "WS close frame"
        );
    }
}
