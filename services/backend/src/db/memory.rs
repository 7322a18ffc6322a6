use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{MergeOutcome, SongStore, StoreError};
use crate::models::{Song, merge_fields, same_key, song_key};

struct StoredSong {
    internal_id: Uuid,
    doc: Song,
}

/// In-process store with the same semantics as [`super::Database`]: ids match
/// on JSON value, with numbers compared numerically. Songs are kept in
/// insertion order.
#[derive(Default)]
pub struct MemoryStore {
    songs: RwLock<Vec<StoredSong>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(stored: &StoredSong, id: &Value) -> bool {
        song_key(&stored.doc).is_some_and(|key| same_key(key, id))
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.songs.read().await.len() as u64)
    }

    async fn list(&self) -> Result<Vec<Song>, StoreError> {
        Ok(self.songs.read().await.iter().map(|s| s.doc.clone()).collect())
    }

    async fn find(&self, id: &Value) -> Result<Option<Song>, StoreError> {
        let songs = self.songs.read().await;
        Ok(songs
            .iter()
            .find(|s| Self::matches(s, id))
            .map(|s| s.doc.clone()))
    }

    async fn insert(&self, song: Song) -> Result<Uuid, StoreError> {
        let internal_id = Uuid::new_v4();
        self.songs.write().await.push(StoredSong {
            internal_id,
            doc: song,
        });
        Ok(internal_id)
    }

    async fn insert_many(&self, songs: Vec<Song>) -> Result<u64, StoreError> {
        let inserted = songs.len() as u64;
        self.songs
            .write()
            .await
            .extend(songs.into_iter().map(|doc| StoredSong {
                internal_id: Uuid::new_v4(),
                doc,
            }));
        Ok(inserted)
    }

    async fn merge(&self, id: i64, patch: Song) -> Result<MergeOutcome, StoreError> {
        let key = json!(id);
        let mut songs = self.songs.write().await;
        let Some(stored) = songs.iter_mut().find(|s| Self::matches(s, &key)) else {
            return Ok(MergeOutcome::NotFound);
        };

        if merge_fields(&mut stored.doc, &patch) {
            Ok(MergeOutcome::Updated(stored.doc.clone()))
        } else {
            Ok(MergeOutcome::Unchanged)
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let key = json!(id);
        let mut songs = self.songs.write().await;
        match songs.iter().position(|s| Self::matches(s, &key)) {
            Some(index) => {
                let removed = songs.remove(index);
                tracing::debug!("removed song document {}", removed.internal_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
