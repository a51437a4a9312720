use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use shared::{
    error::VoteError,
    models::{LiveMessage, VoteOption},
    validation::validate_cast,
};
use crate::{registry::ConnectionRegistry, store::TallyStore};

/// Request-level entry point shared by every route. Built once at startup and
/// handed to Rocket as managed state.
pub struct VoteService {
    store: Arc<dyn TallyStore>,
    registry: Arc<ConnectionRegistry>,
    // held from snapshot read to broadcast so frames leave in read order
    publish_lock: Mutex<()>,
}

impl VoteService {
    pub fn new(store: Arc<dyn TallyStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry, publish_lock: Mutex::new(()) }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub async fn get_votes(&self) -> Result<Vec<VoteOption>, VoteError> {
        self.store.list_options().await.map_err(|e| {
            error!("Failed to list options: {}", e);
            VoteError::from(e)
        })
    }

    /// Validates, increments, then pushes the new snapshot to live clients.
    /// Delivery problems never fail the cast.
    pub async fn cast_vote(&self, name: Option<&str>, option_id: Option<i64>) -> Result<VoteOption, VoteError> {
        let cast = validate_cast(name, option_id)?;

        let option = self.store.cast_vote(cast.option_id).await.map_err(|e| {
            let err = VoteError::from(e);
            if !err.is_client_error() {
                error!(option_id = cast.option_id, "Failed to record vote: {}", err);
            }
            err
        })?;
        debug!(voter = cast.name, option_id = option.id, votes = option.votes, "Vote recorded");

        self.publish_snapshot().await;
        Ok(option)
    }

    async fn publish_snapshot(&self) {
        let _publishing = self.publish_lock.lock().await;

        let snapshot = match self.store.list_options().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Vote committed but snapshot read failed, skipping broadcast: {}", e);
                return;
            }
        };

        let message = match serde_json::to_string(&LiveMessage::update(snapshot)) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize update: {}", e);
                return;
            }
        };

        let delivered = self.registry.broadcast(&message).await;
        debug!(delivered, "Broadcast update");
    }
}
