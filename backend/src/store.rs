use std::str::FromStr;
use std::sync::RwLock;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};
use shared::{error::VoteError, models::VoteOption};
use crate::queries::Queries;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Option {0} not found")]
    NotFound(i64),
    #[error("Store lock poisoned")]
    LockFailed,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StoreError> for VoteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => VoteError::InvalidVoteId,
            other => VoteError::Storage(other.to_string()),
        }
    }
}

/// Authoritative holder of the options and their tallies.
///
/// Implementations must apply `cast_vote` atomically: N successful calls on
/// one id add exactly N regardless of interleaving.
#[rocket::async_trait]
pub trait TallyStore: Send + Sync {
    /// Every option in insertion order.
    async fn list_options(&self) -> Result<Vec<VoteOption>, StoreError>;

    /// Adds one vote and returns the option as it is after the increment.
    async fn cast_vote(&self, id: i64) -> Result<VoteOption, StoreError>;

    /// Adds every title not already present with zero votes. Existing
    /// options keep their counts.
    async fn seed(&self, titles: &[String]) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    options: RwLock<Vec<VoteOption>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl TallyStore for MemoryStore {
    async fn list_options(&self) -> Result<Vec<VoteOption>, StoreError> {
        let options = self.options.read().map_err(|_| StoreError::LockFailed)?;
        Ok(options.clone())
    }

    async fn cast_vote(&self, id: i64) -> Result<VoteOption, StoreError> {
        let mut options = self.options.write().map_err(|_| StoreError::LockFailed)?;
        let option = options
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound(id))?;
        option.votes += 1;
        Ok(option.clone())
    }

    async fn seed(&self, titles: &[String]) -> Result<(), StoreError> {
        let mut options = self.options.write().map_err(|_| StoreError::LockFailed)?;
        for title in titles {
            if options.iter().any(|o| &o.title == title) {
                continue;
            }
            let id = options.iter().map(|o| o.id).max().unwrap_or(0) + 1;
            debug!(id, title = %title, "Seeding option");
            options.push(VoteOption { id, title: title.clone(), votes: 0 });
        }
        Ok(())
    }
}

/// Durable store backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and runs migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("📋 Migrations complete");
        Ok(Self { pool })
    }
}

#[rocket::async_trait]
impl TallyStore for SqliteStore {
    async fn list_options(&self) -> Result<Vec<VoteOption>, StoreError> {
        Ok(Queries::list_options(&self.pool).await?)
    }

    async fn cast_vote(&self, id: i64) -> Result<VoteOption, StoreError> {
        Queries::increment_votes(&self.pool, id)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn seed(&self, titles: &[String]) -> Result<(), StoreError> {
        let inserted = Queries::seed_options(&self.pool, titles).await?;
        if inserted > 0 {
            info!("🌱 Seeded {} vote options", inserted);
        }
        Ok(())
    }
}
