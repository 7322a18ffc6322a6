use axum::response::IntoResponse;

use crate::controllers::RootController;

pub async fn health_check_route() -> impl IntoResponse {
    RootController::health_check().await
}
