use std::str::FromStr;
use std::sync::Arc;

use sqlx::{Pool, Postgres, Sqlite};

use super::errors::StorageError;

// Types
#[derive(Clone, Debug)]
pub(crate) struct SqliteDataStore {
    pool: sqlx::SqlitePool,
}

#[derive(Clone, Debug)]
pub(crate) struct PostgresDataStore {
    pool: sqlx::PgPool,
}

// Trait
pub trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

// Store implementations
impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}

/// Open a connection pool for the database named by `url` and hand it back as
/// a shareable [`DataStore`]. The backend is chosen from the URL scheme:
/// `sqlite:` or `postgres://`.
pub async fn connect_data_store(url: &str) -> Result<Arc<dyn DataStore>, StorageError> {
    if url.starts_with("sqlite:") {
        let opts = sqlx::sqlite::SqliteConnectOptions::from_str(url)
            .map_err(|e| StorageError::Storage(e.to_string()))?
            .create_if_missing(true);

        // An in-memory SQLite database exists per connection; the pool must
        // hold exactly one open connection or every checkout sees a fresh,
        // empty database.
        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            sqlx::sqlite::SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .connect_with(opts)
                .await?
        } else {
            sqlx::sqlite::SqlitePoolOptions::new().connect_with(opts).await?
        };

        tracing::info!("Connected to database: type=sqlite, url={}", url);
        Ok(Arc::new(SqliteDataStore { pool }))
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        let pool = sqlx::PgPool::connect(url).await?;

        tracing::info!("Connected to database: type=postgres, url={}", url);
        Ok(Arc::new(PostgresDataStore { pool }))
    } else {
        Err(StorageError::Unsupported(format!(
            "Unsupported database URL: {url}. Supported schemes are 'sqlite:' and 'postgres://'"
        )))
    }
}
