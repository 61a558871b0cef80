use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};

use sbx_db::{
    models::Suggestion,
    repositories::{category, suggestion},
};

use crate::{ApiState, error::ApiError};

use super::model::CreateSuggestionRequest;

/// Create the suggestion routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/suggestion", post(create_suggestion))
        .route("/suggestion/{suggestion_id}", delete(delete_suggestion))
}

async fn create_suggestion(
    State(state): State<ApiState>,
    Json(payload): Json<CreateSuggestionRequest>,
) -> Result<(StatusCode, Json<Suggestion>), ApiError> {
    payload.validate()?;

    let mut tx = state.pool.begin().await.map_err(ApiError::Database)?;

    if !category::exists(&mut *tx, payload.category_id)
        .await
        .map_err(ApiError::Database)?
    {
        return Err(ApiError::NotFound(format!(
            "Category {} not found",
            payload.category_id
        )));
    }

    let created = suggestion::insert(
        &mut *tx,
        &payload.name,
        &payload.content,
        payload.category_id,
    )
    .await
    .map_err(ApiError::Database)?;

    tx.commit().await.map_err(ApiError::Database)?;

    tracing::info!(
        suggestion_id = created.id,
        category_id = created.category_id,
        "suggestion created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_suggestion(
    State(state): State<ApiState>,
    Path(suggestion_id): Path<i64>,
) -> Result<Json<i64>, ApiError> {
    let deleted = suggestion::delete(&state.pool, suggestion_id)
        .await
        .map_err(ApiError::Database)?;

    if !deleted {
        return Err(ApiError::NotFound(format!(
            "Suggestion {suggestion_id} not found"
        )));
    }

    tracing::info!(suggestion_id, "suggestion deleted");

    Ok(Json(suggestion_id))
}
