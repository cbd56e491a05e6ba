use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::snippet::{errors::SnippetError, types::Snippet};

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), SnippetError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snippets (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created TIMESTAMPTZ NOT NULL,
            expires TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_snippets_expires ON snippets (expires)
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn insert_snippet_postgres(
    pool: &Pool<Postgres>,
    title: &str,
    content: &str,
    created: DateTime<Utc>,
    expires: DateTime<Utc>,
) -> Result<i64, SnippetError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO snippets (title, content, created, expires)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(created)
    .bind(expires)
    .fetch_one(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))
}

pub(super) async fn get_snippet_postgres(
    pool: &Pool<Postgres>,
    id: i64,
    now: DateTime<Utc>,
) -> Result<Option<Snippet>, SnippetError> {
    sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, title, content, created, expires FROM snippets
        WHERE expires > $1 AND id = $2
        "#,
    )
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))
}

pub(super) async fn latest_snippets_postgres(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<Snippet>, SnippetError> {
    sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, title, content, created, expires FROM snippets
        WHERE expires > $1 ORDER BY id DESC LIMIT $2
        "#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))
}
