use serde::{Deserialize, Serialize};

/// Titles seeded into an empty store.
pub const DEFAULT_OPTIONS: [&str; 3] = ["Option A", "Option B", "Option C"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
pub struct VoteOption {
    pub id: i64,
    pub title: String,
    pub votes: i64,
}

/// Ordered view of every option at one point in time.
pub type Snapshot = Vec<VoteOption>;

/// Body of `POST /api/votes/cast/`. Both fields are optional on the wire so
/// that a missing field is reported as invalid data rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastVoteRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

impl CastVoteRequest {
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: Some(name.into()),
            id: Some(id),
        }
    }
}

/// Server to client frames on the live channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum LiveMessage {
    Update(Snapshot),
}

impl LiveMessage {
    pub fn update(snapshot: Snapshot) -> Self {
        LiveMessage::Update(snapshot)
    }

    pub fn snapshot(&self) -> &[VoteOption] {
        match self {
            LiveMessage::Update(snapshot) => snapshot,
        }
    }
}
