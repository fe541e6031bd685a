use crate::gateway::protocol::GatewayEvent;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Per-client queue depth. A client that falls this far behind loses events.
const CLIENT_QUEUE_SIZE: usize = 256;

/// Fans events out to every connected live-update client.
///
/// Delivery is best-effort: there is no replay buffer, so a client only sees
/// events broadcast after its `subscribe()` returned, and a client whose
/// queue is full misses the event.
pub struct EventBroadcaster {
    clients: DashMap<String, mpsc::Sender<GatewayEvent>>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }

    /// Subscribe a new client and return (client_id, receiver).
    pub fn subscribe(&self) -> (String, mpsc::Receiver<GatewayEvent>) {
        let client_id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(CLIENT_QUEUE_SIZE);
        self.clients.insert(client_id.clone(), tx);
        log::debug!("Client {} subscribed to events", client_id);
        (client_id, rx)
    }

    pub fn unsubscribe(&self, client_id: &str) {
        self.clients.remove(client_id);
        log::debug!("Client {} unsubscribed from events", client_id);
    }

    /// Deliver an event to all current subscribers. Never blocks.
    pub fn broadcast(&self, event: GatewayEvent) {
        let event_name = event.event.clone();

        if log::log_enabled!(log::Level::Debug) {
            if let Ok(json) = serde_json::to_string(&event) {
                log::debug!(
                    "[BROADCAST] '{}' to {} client(s): {}",
                    event_name,
                    self.clients.len(),
                    json
                );
            }
        }

        let mut closed = Vec::new();
        for entry in self.clients.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "[BROADCAST] Queue full for client {}, dropping '{}' event",
                        entry.key(),
                        event_name
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    closed.push(entry.key().clone());
                }
            }
        }

        // Removal happens after iteration so no shard guard is held
        for client_id in closed {
            self.clients.remove(&client_id);
            log::debug!("Removed disconnected client {}", client_id);
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
