//! Bookkeeping for live client connections.
//!
//! Each connection is the sending half of a bounded queue; the WebSocket task
//! owning the receiving half forwards whatever arrives to its client. A
//! broadcast works on a copy of the sender set taken under the read lock, so
//! connections may come and go while it is in flight.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, RwLock};
use tokio::time::timeout;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle to one live client channel.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<String>,
}

impl Connection {
    /// Creates a connection and the receiver its client task drains.
    pub fn open(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { id: ConnectionId::new(), sender }, receiver)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Why a single delivery was dropped. Never surfaced past `broadcast`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeliveryFailure {
    #[error("Connection closed")]
    Closed,
    #[error("Send timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>,
    send_timeout: Duration,
    channel_capacity: usize,
}

impl ConnectionRegistry {
    pub fn new(send_timeout: Duration, channel_capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            send_timeout,
            channel_capacity,
        }
    }

    /// Opens a connection sized for this registry. It is not registered yet.
    pub fn open(&self) -> (Connection, mpsc::Receiver<String>) {
        Connection::open(self.channel_capacity)
    }

    pub async fn register(&self, connection: Connection) {
        let mut connections = self.connections.write().await;
        connections.insert(connection.id, connection.sender);
        debug!(connection = %connection.id, total = connections.len(), "Registered connection");
    }

    /// Returns whether the connection was still registered.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(&id).is_some();
        if removed {
            debug!(connection = %id, "Unregistered connection");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Sends `message` to every registered connection and returns how many
    /// accepted it. Targets that are closed or stay full past the send
    /// timeout are dropped from the registry.
    pub async fn broadcast(&self, message: &str) -> usize {
        let targets: Vec<_> = {
            let connections = self.connections.read().await;
            connections.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        if targets.is_empty() {
            return 0;
        }

        let send_timeout = self.send_timeout;
        let results = join_all(targets.into_iter().map(|(id, tx)| {
            let message = message.to_owned();
            async move {
                let outcome = match timeout(send_timeout, tx.send(message)).await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(_)) => Err(DeliveryFailure::Closed),
                    Err(_) => Err(DeliveryFailure::TimedOut(send_timeout)),
                };
                (id, outcome)
            }
        }))
        .await;

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, outcome) in results {
            match outcome {
                Ok(()) => delivered += 1,
                Err(e) => {
                    debug!(connection = %id, error = %e, "Failed to deliver update");
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let mut connections = self.connections.write().await;
            for id in failed {
                connections.remove(&id);
                debug!(connection = %id, "Removed failed connection");
            }
        }

        delivered
    }
}
