use axum::{
    Router,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    response::Response,
    routing::get,
};

use crate::{controllers::SongController, error::ApiError};

/// Unsigned integer song id taken from the path. Only plain digit segments
/// match; anything else (`/song/abc`, `/song/-1`, `/song/+2`) answers 404 like
/// an unmatched route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongId(pub i64);

impl<S> FromRequestParts<S> for SongId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::NOT_FOUND)?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StatusCode::NOT_FOUND);
        }
        raw.parse().map(SongId).map_err(|_| StatusCode::NOT_FOUND)
    }
}

pub fn song_routes() -> Router<SongController> {
    Router::new()
        .route("/count", get(count_route))
        .route("/song", get(list_songs_route).post(create_song_route))
        .route(
            "/song/{id}",
            get(get_song_route).put(update_song_route).delete(delete_song_route),
        )
}

pub async fn count_route(State(controller): State<SongController>) -> Result<Response, ApiError> {
    controller.count().await
}

pub async fn list_songs_route(
    State(controller): State<SongController>,
) -> Result<Response, ApiError> {
    controller.list_songs().await
}

pub async fn get_song_route(
    State(controller): State<SongController>,
    SongId(id): SongId,
) -> Result<Response, ApiError> {
    controller.get_song(id).await
}

pub async fn create_song_route(
    State(controller): State<SongController>,
    body: Bytes,
) -> Result<Response, ApiError> {
    controller.create_song(&body).await
}

pub async fn update_song_route(
    State(controller): State<SongController>,
    SongId(id): SongId,
    body: Bytes,
) -> Result<Response, ApiError> {
    controller.update_song(id, &body).await
}

pub async fn delete_song_route(
    State(controller): State<SongController>,
    SongId(id): SongId,
) -> Result<Response, ApiError> {
    controller.delete_song(id).await
}
