use std::path::Path;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};

use crate::{category, state::ApiState, suggestion, topic};

/// JSON API mounted under `/api`
pub fn api_routes() -> Router<ApiState> {
    Router::new()
        .merge(topic::routes())
        .merge(category::routes())
        .merge(suggestion::routes())
        .fallback(handler_404)
}

/// Health check and API, everything else is a 404
pub fn router() -> Router<ApiState> {
    base().fallback(handler_404)
}

/// Health check and API, every other path served from the built frontend
///
/// Paths that do not name a file under `dist` get `index.html`, so the
/// client-side router can resolve deep links such as `/topics/3`.
pub fn router_with_frontend(dist: impl AsRef<Path>) -> Router<ApiState> {
    let dist = dist.as_ref();
    let spa = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));

    base().fallback_service(spa)
}

fn base() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}
