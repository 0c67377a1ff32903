use std::sync::Arc;

use drawboard_shared::{decode_frame, OperationError, WireMessage};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::state::Room;

/// Checks that an inbound text frame is a well-formed draw event. The relay
/// forwards the original text, so the decoded operation is only inspected.
pub fn validate_frame(text: &str) -> Result<WireMessage, OperationError> {
    decode_frame(text)
}

pub async fn broadcast_except(room: &Arc<RwLock<Room>>, sender: Uuid, frame: &str) -> usize {
    let mut stale = Vec::new();
    let mut delivered = 0;
    {
        let room = room.read().await;
        for (id, tx) in room.peers.iter() {
            if *id == sender {
                continue;
            }
            if tx.send(frame.to_string()).is_err() {
                stale.push(*id);
            } else {
                delivered += 1;
            }
        }
    }

    if !stale.is_empty() {
        let mut room = room.write().await;
        for id in stale {
            room.leave(&id);
        }
    }
    delivered
}
