use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use sbx_db::{
    models::{Topic, TopicDetail},
    repositories::{category, suggestion, topic},
};

use crate::{ApiState, error::ApiError};

use super::model::CreateTopicRequest;

/// Create the topic routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/topic", get(list_topics).post(create_topic))
        .route("/topic/{topic_id}", get(get_topic_detail).delete(delete_topic))
}

async fn list_topics(State(state): State<ApiState>) -> Result<Json<Vec<Topic>>, ApiError> {
    let topics = topic::list_all(&state.pool)
        .await
        .map_err(ApiError::Database)?;

    Ok(Json(topics))
}

/// Topic plus its categories, each carrying its suggestions
async fn get_topic_detail(
    State(state): State<ApiState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<TopicDetail>, ApiError> {
    // One transaction so the three reads see the same snapshot
    let mut tx = state.pool.begin().await.map_err(ApiError::Database)?;

    let found = topic::find_by_id(&mut *tx, topic_id)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound(format!("Topic {topic_id} not found")))?;

    let categories = category::list_by_topic(&mut *tx, topic_id)
        .await
        .map_err(ApiError::Database)?;

    let suggestions = suggestion::list_by_topic(&mut *tx, topic_id)
        .await
        .map_err(ApiError::Database)?;

    tx.commit().await.map_err(ApiError::Database)?;

    tracing::debug!(
        topic_id,
        categories = categories.len(),
        suggestions = suggestions.len(),
        "loaded topic detail"
    );

    Ok(Json(TopicDetail::assemble(found, categories, suggestions)))
}

async fn create_topic(
    State(state): State<ApiState>,
    Json(payload): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<Topic>), ApiError> {
    payload.validate()?;

    let created = topic::insert(&state.pool, &payload.name, &payload.description)
        .await
        .map_err(ApiError::Database)?;

    tracing::info!(topic_id = created.id, "topic created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a topic with its categories and suggestions
async fn delete_topic(
    State(state): State<ApiState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<i64>, ApiError> {
    let deleted = topic::delete(&state.pool, topic_id)
        .await
        .map_err(ApiError::Database)?;

    if !deleted {
        return Err(ApiError::NotFound(format!("Topic {topic_id} not found")));
    }

    tracing::info!(topic_id, "topic deleted");

    Ok(Json(topic_id))
}
