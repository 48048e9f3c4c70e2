//! Live-push connection registry.
//!
//! One channel per connected user, keyed by identity. Delivery is
//! fire-and-forget: a full or closed channel drops the message, and the
//! persisted notification remains the durable record.

use std::collections::HashMap;
use std::sync::Arc;

use common::UserId;
use domain::NotificationType;
use serde::Serialize;
use tokio::sync::{RwLock, mpsc};

/// The `{type, payload}` event sent over a recipient's live connection.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub payload: serde_json::Value,
}

/// Registry of live push connections.
#[derive(Clone, Default)]
pub struct PushRegistry {
    channels: Arc<RwLock<HashMap<UserId, mpsc::UnboundedSender<PushMessage>>>>,
}

impl PushRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a user, replacing any previous connection.
    pub async fn connect(&self, user_id: UserId) -> mpsc::UnboundedReceiver<PushMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.write().await.insert(user_id, tx);
        rx
    }

    /// Drops a user's live connection.
    pub async fn disconnect(&self, user_id: UserId) {
        self.channels.write().await.remove(&user_id);
    }

    /// Best-effort delivery; a failed send evicts the dead channel.
    pub async fn push(&self, user_id: UserId, message: PushMessage) {
        let mut channels = self.channels.write().await;
        if let Some(tx) = channels.get(&user_id)
            && tx.send(message).is_err()
        {
            tracing::debug!(%user_id, "push channel closed, evicting");
            channels.remove(&user_id);
        }
    }

    /// Returns true if the user has a live connection.
    pub async fn is_connected(&self, user_id: UserId) -> bool {
        self.channels.read().await.contains_key(&user_id)
    }
}
