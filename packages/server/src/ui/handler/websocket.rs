//! WebSocket connection handlers.
//!
//! A client watches exactly one room: `GET /ws?room_id=<id>`.
//! The first frame is a `room-snapshot`; afterwards every event of that room
//! is forwarded as it is published.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    domain::{RoomEvent, RoomId},
    infrastructure::dto::{
        http::RoomDetailDto,
        websocket::{ServerEvent, WatchQuery},
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<WatchQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match RoomId::new(query.room_id.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid room_id format: '{}'", query.room_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    if state.get_room_detail_usecase.execute(&room_id).await.is_err() {
        tracing::warn!("Rejecting watcher for unknown room '{}'", room_id);
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id)))
}

type WsSender = SplitSink<WebSocket, Message>;

async fn send_event(sender: &mut WsSender, event: &ServerEvent) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize event: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(json.into())).await
}

/// Current room state as a snapshot event; `None` once the room is gone
async fn snapshot(state: &AppState, room_id: &RoomId) -> Option<ServerEvent> {
    let view = state.get_room_detail_usecase.execute(room_id).await.ok()?;
    Some(ServerEvent::RoomSnapshot {
        room: RoomDetailDto::from_room(&view.room, view.active),
    })
}

/// Spawns a task that forwards this room's events to the WebSocket sender.
///
/// The task ends when the room is deleted, the channel closes or the client
/// stops accepting frames.
fn pusher_loop(
    state: Arc<AppState>,
    room_id: RoomId,
    mut events: broadcast::Receiver<RoomEvent>,
    mut sender: WsSender,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    // 取りこぼした分はスナップショットで埋め合わせる
                    tracing::warn!(
                        "Watcher of room {} lagged behind by {} event(s), resyncing",
                        room_id,
                        skipped
                    );
                    match snapshot(&state, &room_id).await {
                        Some(event) => {
                            if send_event(&mut sender, &event).await.is_err() {
                                break;
                            }
                            continue;
                        }
                        None => RoomEvent::RoomDeleted {
                            room_id: room_id.clone(),
                        },
                    }
                }
                Err(RecvError::Closed) => break,
            };
            if event.room_id() != &room_id {
                continue;
            }

            let deleted = matches!(event, RoomEvent::RoomDeleted { .. });
            if send_event(&mut sender, &ServerEvent::from(&event))
                .await
                .is_err()
            {
                break;
            }
            if deleted {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    let (mut sender, mut receiver) = socket.split();

    // スナップショットより前に購読し、その間のイベントを取りこぼさない
    let events = state.events.subscribe();

    let Some(initial) = snapshot(&state, &room_id).await else {
        let _ = send_event(&mut sender, &ServerEvent::RoomDeleted).await;
        return;
    };
    if let Err(e) = send_event(&mut sender, &initial).await {
        tracing::error!("Failed to send snapshot of room {}: {}", room_id, e);
        return;
    }
    tracing::info!("Watcher attached to room {}", room_id);

    let room_id_for_recv = room_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!("Watcher of room {} requested close", room_id_for_recv);
                    break;
                }
                Ok(Message::Text(text)) => {
                    tracing::debug!("Ignoring client frame: {}", text);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    // Spawn a task to push room events to this client
    let mut send_task = pusher_loop(state.clone(), room_id.clone(), events, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    tracing::info!("Watcher detached from room {}", room_id);
}
