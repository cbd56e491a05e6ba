mod postgres;
mod sqlite;

use std::sync::Arc;

use chrono::Utc;

use crate::storage::DataStore;
use crate::userdb::{errors::UserError, password, types::User};

use postgres::*;
use sqlite::*;

/// Account storage and credential checks over the shared [`DataStore`].
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DataStore>,
}

impl UserStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        // Pay the fallback-hash cost here instead of on the first failed
        // login.
        password::warm_fallback_hash();
        Self { store }
    }

    /// Create the users table and its unique email index.
    pub async fn init(&self) -> Result<(), UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Register a new account and return its id. The email must not be
    /// registered yet; the unique index decides that atomically and a
    /// violation surfaces as [`UserError::DuplicateEmail`].
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, UserError> {
        let hashed = password::hash(password.to_string()).await?;
        let created = Utc::now();

        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => insert_user_sqlite(pool, name, email, &hashed, created).await,
            (_, Some(pool)) => insert_user_postgres(pool, name, email, &hashed, created).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Check an email/password pair and return the account id.
    ///
    /// Unknown email and wrong password both come back as
    /// [`UserError::InvalidCredentials`], and the unknown-email path still
    /// burns one bcrypt comparison so the two are not separable by timing.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<i64, UserError> {
        let credentials = match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => get_credentials_sqlite(pool, email).await?,
            (_, Some(pool)) => get_credentials_postgres(pool, email).await?,
            _ => return Err(UserError::Storage("Unsupported database type".to_string())),
        };

        match credentials {
            Some((id, hashed)) => {
                if password::verify(password.to_string(), hashed).await? {
                    Ok(id)
                } else {
                    Err(UserError::InvalidCredentials)
                }
            }
            None => {
                password::verify_fallback(password.to_string()).await;
                Err(UserError::InvalidCredentials)
            }
        }
    }

    /// True when an account with this id exists. Sessions re-check this so a
    /// deleted account cannot keep an authenticated session alive.
    pub async fn exists(&self, id: i64) -> Result<bool, UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => user_exists_sqlite(pool, id).await,
            (_, Some(pool)) => user_exists_postgres(pool, id).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Fetch an account by id.
    pub async fn get(&self, id: i64) -> Result<Option<User>, UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => get_user_sqlite(pool, id).await,
            (_, Some(pool)) => get_user_postgres(pool, id).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }
}

/// Translate an insert failure, keeping the unique-index signal distinct
/// from other database errors.
fn map_insert_error(err: sqlx::Error) -> UserError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => UserError::DuplicateEmail,
        _ => UserError::Storage(err.to_string()),
    }
}
