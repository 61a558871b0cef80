use sqlx::{Executor, Sqlite};

use crate::models::Category;

pub async fn list_by_topic<'e, E>(executor: E, topic_id: i64) -> Result<Vec<Category>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, name, topic_id
            FROM categories
            WHERE topic_id = ?
            ORDER BY id
        "#,
    )
    .bind(topic_id)
    .fetch_all(executor)
    .await
}

pub async fn exists<'e, E>(executor: E, category_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        // language=SQLite
        r#"
            SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)
        "#,
    )
    .bind(category_id)
    .fetch_one(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, name: &str, topic_id: i64) -> Result<Category, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            INSERT INTO categories (name, topic_id)
            VALUES (?, ?)
            RETURNING id, name, topic_id
        "#,
    )
    .bind(name)
    .bind(topic_id)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E>(executor: E, category_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            DELETE FROM categories
            WHERE id = ?
        "#,
    )
    .bind(category_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
