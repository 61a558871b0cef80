use sqlx::{Executor, Sqlite};

use crate::models::Topic;

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Topic>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, name, description
            FROM topics
            ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, topic_id: i64) -> Result<Option<Topic>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, name, description
            FROM topics
            WHERE id = ?
        "#,
    )
    .bind(topic_id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, name: &str, description: &str) -> Result<Topic, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            INSERT INTO topics (name, description)
            VALUES (?, ?)
            RETURNING id, name, description
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(executor)
    .await
}

/// Delete a topic and, through the cascade, everything under it.
///
/// Returns `false` when no topic had this id.
pub async fn delete<'e, E>(executor: E, topic_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            DELETE FROM topics
            WHERE id = ?
        "#,
    )
    .bind(topic_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
