use std::time::Duration;
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};
use shared::{models::DEFAULT_OPTIONS, validation::{validate_seed_options, SeedError}};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Memory,
}

/// Application settings, read from the same figment as Rocket's own config
/// so `Rocket.toml` and `ROCKET_*` variables apply to both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreKind,
    pub database_url: String,
    pub max_connections: u32,
    pub seed_options: Vec<String>,
    pub broadcast_timeout_ms: u64,
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Sqlite,
            database_url: "sqlite://votes.db".into(),
            max_connections: 5,
            seed_options: DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect(),
            broadcast_timeout_ms: 250,
            channel_capacity: 32,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Extract(#[from] Box<rocket::figment::Error>),
    #[error("Invalid seed options: {0}")]
    Seed(#[from] SeedError),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl AppConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: AppConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_seed_options(&self.seed_options)?;
        if self.max_connections == 0 { return Err(ConfigError::Zero("max_connections")); }
        if self.broadcast_timeout_ms == 0 { return Err(ConfigError::Zero("broadcast_timeout_ms")); }
        if self.channel_capacity == 0 { return Err(ConfigError::Zero("channel_capacity")); }
        Ok(())
    }

    pub fn broadcast_timeout(&self) -> Duration {
        Duration::from_millis(self.broadcast_timeout_ms)
    }
}
