use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::snippet::{errors::SnippetError, types::Snippet};

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), SnippetError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snippets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created TEXT NOT NULL,
            expires TEXT NOT NULL
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

pub(super) async fn insert_snippet_sqlite(
    pool: &Pool<Sqlite>,
    title: &str,
    content: &str,
    created: DateTime<Utc>,
    expires: DateTime<Utc>,
) -> Result<i64, SnippetError> {
    let result = sqlx::query(
        r#"
        INSERT INTO snippets (title, content, created, expires)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(created)
    .bind(expires)
    .execute(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))?;

    Ok(result.last_insert_rowid())
}

pub(super) async fn get_snippet_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    now: DateTime<Utc>,
) -> Result<Option<Snippet>, SnippetError> {
    sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, title, content, created, expires FROM snippets
        WHERE expires > ? AND id = ?
        "#,
    )
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))
}

pub(super) async fn latest_snippets_sqlite(
    pool: &Pool<Sqlite>,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<Snippet>, SnippetError> {
    sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, title, content, created, expires FROM snippets
        WHERE expires > ? ORDER BY id DESC LIMIT ?
        "#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| SnippetError::Storage(e.to_string()))
}
