use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    db::{MergeOutcome, SharedStore},
    error::ApiError,
    models::{InsertedSong, Song, SongCount, SongList, song_key},
};

const NO_DATA: &str = "No data provided";

/// Song CRUD handlers. Each method issues a single store call and shapes the
/// outcome into a status code and JSON body.
#[derive(Clone)]
pub struct SongController {
    store: SharedStore,
}

impl SongController {
    pub fn new(store: SharedStore) -> Self {
        SongController { store }
    }

    pub async fn count(&self) -> Result<Response, ApiError> {
        let count = self.store.count().await?;
        Ok((StatusCode::OK, Json(SongCount { count })).into_response())
    }

    pub async fn list_songs(&self) -> Result<Response, ApiError> {
        let songs = self.store.list().await?;
        Ok((StatusCode::OK, Json(SongList { songs })).into_response())
    }

    pub async fn get_song(&self, id: i64) -> Result<Response, ApiError> {
        match self.store.find(&json!(id)).await? {
            Some(song) => Ok((StatusCode::OK, Json(song)).into_response()),
            None => {
                debug!("song {} not found", id);
                Err(ApiError::NotFound("song with id not found".to_string()))
            }
        }
    }

    pub async fn create_song(&self, body: &[u8]) -> Result<Response, ApiError> {
        let song = parse_body(body)?;

        if let Some(id) = song_key(&song) {
            if self.store.find(id).await?.is_some() {
                debug!("rejecting duplicate song id {}", id);
                return Err(ApiError::Conflict(format!(
                    "song with id {} already present",
                    display_id(id)
                )));
            }
        }

        let inserted_id = self.store.insert(song).await?;
        info!("created song document {}", inserted_id);
        Ok((
            StatusCode::CREATED,
            Json(InsertedSong {
                inserted_id: inserted_id.to_string(),
            }),
        )
            .into_response())
    }

    pub async fn update_song(&self, id: i64, body: &[u8]) -> Result<Response, ApiError> {
        let patch = parse_body(body)?;

        match self.store.merge(id, patch).await? {
            MergeOutcome::NotFound => Err(ApiError::NotFound("song not found".to_string())),
            MergeOutcome::Unchanged => Ok((
                StatusCode::OK,
                Json(json!({ "message": "song found, but nothing updated" })),
            )
                .into_response()),
            // existing clients expect 201 here
            MergeOutcome::Updated(song) => Ok((StatusCode::CREATED, Json(song)).into_response()),
        }
    }

    pub async fn delete_song(&self, id: i64) -> Result<Response, ApiError> {
        if self.store.delete(id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(ApiError::NotFound("song not found".to_string()))
        }
    }
}

/// A request body must be a JSON object with at least one field.
fn parse_body(body: &[u8]) -> Result<Song, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(song)) if !song.is_empty() => Ok(song),
        _ => Err(ApiError::BadRequest(NO_DATA.to_string())),
    }
}

fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
