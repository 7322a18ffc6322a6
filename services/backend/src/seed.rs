use std::path::Path;

use anyhow::{Context, bail};
use serde_json::Value;
use tracing::info;

use crate::db::{SongStore, StoreError};
use crate::models::Song;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The collection already held documents, or there was nothing to load.
    Skipped { existing: u64 },
    Seeded { inserted: u64 },
}

/// Populates the collection with `songs` only when it is currently empty.
pub async fn seed_if_empty(
    store: &dyn SongStore,
    songs: Vec<Song>,
) -> Result<SeedOutcome, StoreError> {
    let existing = store.count().await?;
    if existing > 0 || songs.is_empty() {
        info!("Skipping seed, collection holds {} songs", existing);
        return Ok(SeedOutcome::Skipped { existing });
    }

    let inserted = store.insert_many(songs).await?;
    info!("Seeded collection with {} songs", inserted);
    Ok(SeedOutcome::Seeded { inserted })
}

/// Reads a JSON array of song objects.
pub async fn load_seed_file(path: &Path) -> anyhow::Result<Vec<Song>> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read seed file {}", path.display()))?;
    let value: Value = serde_json::from_slice(&raw)
        .with_context(|| format!("seed file {} is not valid JSON", path.display()))?;

    let Value::Array(items) = value else {
        bail!("seed file {} must contain a JSON array", path.display());
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(song) => Ok(song),
            _ => bail!("seed entry {} is not an object", index),
        })
        .collect()
}
