mod postgres;
mod sqlite;

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::snippet::{errors::SnippetError, types::Snippet};
use crate::storage::DataStore;

use postgres::*;
use sqlite::*;

/// Lifetimes a snippet may be created with, in days.
pub const PERMITTED_EXPIRY_DAYS: [i64; 3] = [365, 7, 1];

/// How many snippets the home page shows.
const LATEST_LIMIT: i64 = 10;

/// Snippet storage over the shared [`DataStore`].
#[derive(Clone)]
pub struct SnippetStore {
    store: Arc<dyn DataStore>,
}

impl SnippetStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Create the snippets table and its expiry index.
    pub async fn init(&self) -> Result<(), SnippetError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(SnippetError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Store a new snippet expiring `expires_days` from now and return its id.
    pub async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i64,
    ) -> Result<i64, SnippetError> {
        let created = Utc::now();
        let expires = created + Duration::days(expires_days);

        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => insert_snippet_sqlite(pool, title, content, created, expires).await,
            (_, Some(pool)) => {
                insert_snippet_postgres(pool, title, content, created, expires).await
            }
            _ => Err(SnippetError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Fetch one live snippet. Expired snippets answer exactly like rows that
    /// never existed.
    pub async fn get(&self, id: i64) -> Result<Snippet, SnippetError> {
        let now = Utc::now();
        let snippet = match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => get_snippet_sqlite(pool, id, now).await?,
            (_, Some(pool)) => get_snippet_postgres(pool, id, now).await?,
            _ => {
                return Err(SnippetError::Storage(
                    "Unsupported database type".to_string(),
                ));
            }
        };

        snippet.ok_or(SnippetError::NotFound)
    }

    /// The ten newest live snippets, newest first.
    pub async fn latest(&self) -> Result<Vec<Snippet>, SnippetError> {
        let now = Utc::now();
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => latest_snippets_sqlite(pool, now, LATEST_LIMIT).await,
            (_, Some(pool)) => latest_snippets_postgres(pool, now, LATEST_LIMIT).await,
            _ => Err(SnippetError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }
}
