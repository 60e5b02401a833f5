use serde::Serialize;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Frame pushed to clients: `{ "event": ..., "data": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeEvent {
    pub event: String,
    pub data: Value,
}

impl RealtimeEvent {
    pub fn new(event: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            event: event.into(),
            data: serde_json::to_value(data).unwrap_or(Value::Null),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

struct Connection {
    id: ConnectionId,
    sender: UnboundedSender<String>,
}

/// Per-user rooms of live socket connections. A user may hold several
/// connections; each gets every event addressed to the user.
#[derive(Default)]
pub struct RealtimeHub {
    rooms: Mutex<HashMap<String, Vec<Connection>>>,
    next_id: AtomicU64,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<String, Vec<Connection>>> {
        match self.rooms.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn join(&self, user_id: &str) -> (ConnectionId, UnboundedReceiver<String>) {
        let (sender, receiver) = unbounded_channel();
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.rooms()
            .entry(user_id.to_string())
            .or_default()
            .push(Connection { id, sender });
        log::debug!("User {} joined realtime room", user_id);

        (id, receiver)
    }

    pub fn leave(&self, user_id: &str, id: ConnectionId) {
        let mut rooms = self.rooms();
        if let Some(connections) = rooms.get_mut(user_id) {
            connections.retain(|connection| connection.id != id);
            if connections.is_empty() {
                rooms.remove(user_id);
            }
        }
    }

    /// Best effort: returns how many connections accepted the frame and
    /// drops the ones whose receiver is gone.
    pub fn emit(&self, user_id: &str, event: &RealtimeEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Failed to serialize realtime event {}: {}", event.event, err);
                return 0;
            }
        };

        let mut rooms = self.rooms();
        let Some(connections) = rooms.get_mut(user_id) else {
            return 0;
        };

        connections.retain(|connection| connection.sender.send(payload.clone()).is_ok());
        let delivered = connections.len();
        if delivered == 0 {
            rooms.remove(user_id);
        }
        delivered
    }

    pub fn connection_count(&self, user_id: &str) -> usize {
        self.rooms().get(user_id).map_or(0, Vec::len)
    }
}
