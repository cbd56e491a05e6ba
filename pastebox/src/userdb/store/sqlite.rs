use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::userdb::{errors::UserError, types::User};

use super::map_insert_error;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            hashed_password TEXT NOT NULL,
            created TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS users_uc_email ON users (email)
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn insert_user_sqlite(
    pool: &Pool<Sqlite>,
    name: &str,
    email: &str,
    hashed_password: &str,
    created: DateTime<Utc>,
) -> Result<i64, UserError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, hashed_password, created)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(created)
    .execute(pool)
    .await
    .map_err(map_insert_error)?;

    Ok(result.last_insert_rowid())
}

pub(super) async fn get_credentials_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<(i64, String)>, UserError> {
    sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT id, hashed_password FROM users WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
) -> Result<Option<User>, UserError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, hashed_password, created FROM users WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn user_exists_sqlite(pool: &Pool<Sqlite>, id: i64) -> Result<bool, UserError> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}
