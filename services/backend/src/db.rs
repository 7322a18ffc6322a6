use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Song;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::Database;

/// Store handle shared by every request handler.
pub type SharedStore = Arc<dyn SongStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("stored document is not an object: {0}")]
    Corrupt(String),
}

/// Result of a field-level merge against a single song.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    NotFound,
    Unchanged,
    Updated(Song),
}

/// Single collection of song documents keyed by their `id` field.
///
/// Every method maps to exactly one store operation. Implementations never
/// return the internal document identifier as part of a [`Song`].
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Round trip to the backing store, used at startup to fail fast.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// All songs, in whatever order the store yields them.
    async fn list(&self) -> Result<Vec<Song>, StoreError>;

    /// First song whose `id` field equals `id`.
    async fn find(&self, id: &Value) -> Result<Option<Song>, StoreError>;

    /// Stores the song as given and returns the internal identifier it was assigned.
    async fn insert(&self, song: Song) -> Result<Uuid, StoreError>;

    /// Inserts all songs or none of them.
    async fn insert_many(&self, songs: Vec<Song>) -> Result<u64, StoreError>;

    async fn merge(&self, id: i64, patch: Song) -> Result<MergeOutcome, StoreError>;

    /// Removes at most one song. Returns whether one was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

fn into_song(value: Value) -> Result<Song, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Corrupt(other.to_string())),
    }
}
