use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub struct RootController;

impl RootController {
    pub async fn health_check() -> Response {
        (StatusCode::OK, Json(HealthResponse { status: "OK" })).into_response()
    }
}
