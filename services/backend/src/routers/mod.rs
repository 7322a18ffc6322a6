pub mod root;
pub mod song;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::SongController;
use crate::db::SharedStore;

pub use root::health_check_route;
pub use song::{SongId, song_routes};

/// Full HTTP surface with middleware, bound to the given store.
pub fn app(store: SharedStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_route))
        .merge(song_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(SongController::new(store))
}
