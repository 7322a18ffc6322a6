use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::{Value, json};
use sqlx::{PgPool, postgres::PgPoolOptions, types::Json};
use tracing::debug;
use uuid::Uuid;

use super::{MergeOutcome, SongStore, StoreError, into_song};
use crate::models::Song;

/// PostgreSQL backed document store. Each song lives in one JSONB column next
/// to a UUID primary key that serves as the internal document id.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(classify_connect_error)?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool, e.g. one provisioned by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

// 28P01 invalid_password, 28000 invalid_authorization_specification
fn classify_connect_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(db_err.code().as_deref(), Some("28P01" | "28000")) {
            return StoreError::Authentication(db_err.message().to_string());
        }
    }
    StoreError::Connection(err)
}

#[async_trait]
impl SongStore for Database {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn list(&self) -> Result<Vec<Song>, StoreError> {
        sqlx::query_scalar::<_, Json<Value>>("SELECT doc FROM songs")
            .fetch(&self.pool)
            .map_err(StoreError::from)
            .and_then(|Json(doc)| async move { into_song(doc) })
            .try_collect()
            .await
    }

    async fn find(&self, id: &Value) -> Result<Option<Song>, StoreError> {
        let doc = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT doc FROM songs WHERE doc -> 'id' = $1 LIMIT 1",
        )
        .bind(Json(id))
        .fetch_optional(&self.pool)
        .await?;

        doc.map(|Json(doc)| into_song(doc)).transpose()
    }

    async fn insert(&self, song: Song) -> Result<Uuid, StoreError> {
        let internal_id = Uuid::new_v4();
        sqlx::query("INSERT INTO songs (_id, doc) VALUES ($1, $2)")
            .bind(internal_id)
            .bind(Json(&song))
            .execute(&self.pool)
            .await?;

        debug!("inserted song document {}", internal_id);
        Ok(internal_id)
    }

    async fn insert_many(&self, songs: Vec<Song>) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for song in songs {
            sqlx::query("INSERT INTO songs (_id, doc) VALUES ($1, $2)")
                .bind(Uuid::new_v4())
                .bind(Json(&song))
                .execute(&mut *tx)
                .await?;
            inserted += 1;
        }
        tx.commit().await?;

        Ok(inserted)
    }

    async fn merge(&self, id: i64, patch: Song) -> Result<MergeOutcome, StoreError> {
        // `||` replaces top-level keys, so comparing the merged document with the
        // current one tells whether any value changed.
        let (matched, updated): (bool, Option<Json<Value>>) = sqlx::query_as(
            "WITH target AS (
                 SELECT _id, doc FROM songs WHERE doc -> 'id' = $1 LIMIT 1 FOR UPDATE
             ), updated AS (
                 UPDATE songs SET doc = target.doc || $2
                 FROM target
                 WHERE songs._id = target._id AND target.doc || $2 <> target.doc
                 RETURNING songs.doc
             )
             SELECT EXISTS (SELECT 1 FROM target), (SELECT doc FROM updated)",
        )
        .bind(Json(json!(id)))
        .bind(Json(&patch))
        .fetch_one(&self.pool)
        .await?;

        match (matched, updated) {
            (false, _) => Ok(MergeOutcome::NotFound),
            (true, None) => Ok(MergeOutcome::Unchanged),
            (true, Some(Json(doc))) => Ok(MergeOutcome::Updated(into_song(doc)?)),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM songs WHERE _id = (SELECT _id FROM songs WHERE doc -> 'id' = $1 LIMIT 1)",
        )
        .bind(Json(json!(id)))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
