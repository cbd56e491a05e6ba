use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::storage::CacheStore;
use crate::utils::gen_random_string;

use super::config::SESSION_COOKIE_MAX_AGE;
use super::errors::SessionError;
use super::types::{Session, SessionRecord};

const SESSION_PREFIX: &str = "session";

/// Creates, loads and persists sessions against the cache store.
#[derive(Clone)]
pub struct SessionManager {
    cache: Arc<dyn CacheStore>,
    lifetime: u64,
}

impl SessionManager {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self::with_lifetime(cache, *SESSION_COOKIE_MAX_AGE)
    }

    pub fn with_lifetime(cache: Arc<dyn CacheStore>, lifetime_secs: u64) -> Self {
        Self {
            cache,
            lifetime: lifetime_secs,
        }
    }

    /// Max-Age for the session cookie, in seconds.
    pub fn cookie_max_age(&self) -> i64 {
        self.lifetime as i64
    }

    /// Begin a fresh anonymous session. Nothing is persisted until
    /// [`SessionManager::save`] runs at the end of the request.
    pub fn start(&self) -> Result<Session, SessionError> {
        let token = gen_random_string(32)?;
        let csrf_token = gen_random_string(32)?;
        let record = SessionRecord {
            data: HashMap::new(),
            csrf_token,
            expires_at: Utc::now() + Duration::seconds(self.lifetime as i64),
            ttl: self.lifetime,
        };
        Ok(Session::fresh(token, record))
    }

    /// Resolve a cookie token to its session. Unknown tokens and expired
    /// records both come back as `None`; an expired record is deleted on
    /// sight.
    pub async fn load(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let cached = self
            .cache
            .get(SESSION_PREFIX, token)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        let Some(cached) = cached else {
            return Ok(None);
        };

        let record: SessionRecord = cached.try_into()?;
        if record.expires_at <= Utc::now() {
            self.cache
                .remove(SESSION_PREFIX, token)
                .await
                .map_err(|e| SessionError::Storage(e.to_string()))?;
            return Ok(None);
        }

        Ok(Some(Session::loaded(token.to_string(), record)))
    }

    /// Persist a session at the end of its request. Deletes the pre-renewal
    /// record first so a rotated-away token dies even if the write fails,
    /// then writes the record when anything changed.
    pub async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let commit = session.commit_state();

        if let Some(stale) = &commit.stale_token {
            self.cache
                .remove(SESSION_PREFIX, stale)
                .await
                .map_err(|e| SessionError::Storage(e.to_string()))?;
        }

        if !commit.dirty {
            return Ok(());
        }

        let ttl = (commit.record.expires_at - Utc::now()).num_seconds().max(0) as usize;
        self.cache
            .put_with_ttl(SESSION_PREFIX, &commit.token, commit.record.into(), ttl)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))
    }
}
