use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};

use sbx_db::{
    models::Category,
    repositories::{category, topic},
};

use crate::{ApiState, error::ApiError};

use super::model::CreateCategoryRequest;

/// Create the category routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/category", post(create_category))
        .route("/category/{category_id}", delete(delete_category))
}

/// Create a category under an existing topic
///
/// The response carries no `suggestions` field; a fresh category has none.
async fn create_category(
    State(state): State<ApiState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload.validate()?;

    let mut tx = state.pool.begin().await.map_err(ApiError::Database)?;

    if topic::find_by_id(&mut *tx, payload.topic_id)
        .await
        .map_err(ApiError::Database)?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "Topic {} not found",
            payload.topic_id
        )));
    }

    let created = category::insert(&mut *tx, &payload.name, payload.topic_id)
        .await
        .map_err(ApiError::Database)?;

    tx.commit().await.map_err(ApiError::Database)?;

    tracing::info!(
        category_id = created.id,
        topic_id = created.topic_id,
        "category created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_category(
    State(state): State<ApiState>,
    Path(category_id): Path<i64>,
) -> Result<Json<i64>, ApiError> {
    let deleted = category::delete(&state.pool, category_id)
        .await
        .map_err(ApiError::Database)?;

    if !deleted {
        return Err(ApiError::NotFound(format!(
            "Category {category_id} not found"
        )));
    }

    tracing::info!(category_id, "category deleted");

    Ok(Json(category_id))
}
