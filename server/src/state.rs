use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

pub const DEFAULT_ROOM: &str = "global";

pub type PeerSender = mpsc::UnboundedSender<String>;

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<String, Arc<RwLock<Room>>>>>,
    pub room_name: String,
}

#[derive(Default)]
pub struct Room {
    pub peers: HashMap<Uuid, PeerSender>,
}

impl AppState {
    pub fn new(room_name: impl Into<String>) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            room_name: room_name.into(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM)
    }
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, connection_id: Uuid, sender: PeerSender) {
        self.peers.insert(connection_id, sender);
    }

    pub fn leave(&mut self, connection_id: &Uuid) -> bool {
        self.peers.remove(connection_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
