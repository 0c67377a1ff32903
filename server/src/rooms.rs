use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::state::{AppState, PeerSender, Room};

// The registry lock is held across the insert so a concurrent
// `leave_room` cannot drop the room between lookup and join.
pub async fn join_room(
    state: &AppState,
    room_name: &str,
    connection_id: Uuid,
    sender: PeerSender,
) -> (Arc<RwLock<Room>>, usize) {
    let mut rooms = state.rooms.write().await;
    let room = rooms
        .entry(room_name.to_string())
        .or_insert_with(|| {
            debug!(room = room_name, "creating room");
            Arc::new(RwLock::new(Room::new()))
        })
        .clone();
    let peers = {
        let mut room = room.write().await;
        room.join(connection_id, sender);
        room.len()
    };
    (room, peers)
}

pub async fn leave_room(
    state: &AppState,
    room_name: &str,
    room: &Arc<RwLock<Room>>,
    connection_id: &Uuid,
) -> usize {
    let mut rooms = state.rooms.write().await;
    let (remaining, empty) = {
        let mut room = room.write().await;
        room.leave(connection_id);
        (room.len(), room.is_empty())
    };
    if empty {
        if let Some(current) = rooms.get(room_name) {
            if Arc::ptr_eq(current, room) {
                rooms.remove(room_name);
                debug!(room = room_name, "removed empty room");
            }
        }
    }
    remaining
}

pub async fn peer_count(state: &AppState, room_name: &str) -> usize {
    let room = state.rooms.read().await.get(room_name).cloned();
    match room {
        Some(room) => room.read().await.len(),
        None => 0,
    }
}
