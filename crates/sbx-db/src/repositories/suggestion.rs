use sqlx::{Executor, Sqlite};

use crate::models::Suggestion;

/// Every suggestion filed under any category of `topic_id`, oldest first.
pub async fn list_by_topic<'e, E>(executor: E, topic_id: i64) -> Result<Vec<Suggestion>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT s.id, s.name, s.content, s.category_id
            FROM suggestions s
            JOIN categories c ON c.id = s.category_id
            WHERE c.topic_id = ?
            ORDER BY s.id
        "#,
    )
    .bind(topic_id)
    .fetch_all(executor)
    .await
}

pub async fn insert<'e, E>(
    executor: E,
    name: &str,
    content: &str,
    category_id: i64,
) -> Result<Suggestion, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            INSERT INTO suggestions (name, content, category_id)
            VALUES (?, ?, ?)
            RETURNING id, name, content, category_id
        "#,
    )
    .bind(name)
    .bind(content)
    .bind(category_id)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E>(executor: E, suggestion_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            DELETE FROM suggestions
            WHERE id = ?
        "#,
    )
    .bind(suggestion_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
