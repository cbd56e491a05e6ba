use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::CacheData;
use crate::utils::gen_random_string;

use super::errors::SessionError;

/// Data-map key holding the signed-in account id.
pub const AUTH_USER_ID_KEY: &str = "authenticatedUserId";

/// Data-map key holding the one-shot confirmation message.
pub const FLASH_KEY: &str = "flash";

/// What the cache store holds per session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct SessionRecord {
    pub(super) data: HashMap<String, Value>,
    pub(super) csrf_token: String,
    pub(super) expires_at: DateTime<Utc>,
    pub(super) ttl: u64,
}

impl From<SessionRecord> for CacheData {
    fn from(record: SessionRecord) -> Self {
        Self {
            value: serde_json::to_string(&record).expect("Failed to serialize session record"),
        }
    }
}

impl TryFrom<CacheData> for SessionRecord {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Storage(e.to_string()))
    }
}

#[derive(Debug)]
struct SessionState {
    token: String,
    record: SessionRecord,
    /// The record differs from what the cache holds and must be written back.
    dirty: bool,
    /// Created for this request; no record exists in the cache yet.
    fresh: bool,
    /// The token this session was loaded under, once `renew_token` has
    /// replaced it. The old record must be deleted at save time.
    stale_token: Option<String>,
}

/// Snapshot handed to the manager when a request finishes.
pub(super) struct CommitState {
    pub(super) token: String,
    pub(super) record: SessionRecord,
    pub(super) dirty: bool,
    pub(super) stale_token: Option<String>,
}

/// One visitor's session for the duration of a request.
///
/// The handle is cheap to clone and shared through request extensions; all
/// mutation goes through it so the middleware can persist exactly what the
/// handlers changed.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    pub(super) fn fresh(token: String, record: SessionRecord) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                token,
                record,
                dirty: true,
                fresh: true,
                stale_token: None,
            })),
        }
    }

    pub(super) fn loaded(token: String, record: SessionRecord) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                token,
                record,
                dirty: false,
                fresh: false,
                stale_token: None,
            })),
        }
    }

    pub fn token(&self) -> String {
        self.state.lock().token.clone()
    }

    pub fn csrf_token(&self) -> String {
        self.state.lock().record.csrf_token.clone()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.state.lock().record.expires_at
    }

    /// A `Set-Cookie` is only needed when the token is not the one the
    /// request came in with.
    pub fn needs_cookie(&self) -> bool {
        let state = self.state.lock();
        state.fresh || state.stale_token.is_some()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.lock().record.data.get(key).cloned()
    }

    pub fn put(&self, key: &str, value: Value) {
        let mut state = self.state.lock();
        state.record.data.insert(key.to_string(), value);
        state.dirty = true;
    }

    pub fn remove(&self, key: &str) {
        let mut state = self.state.lock();
        state.record.data.remove(key);
        state.dirty = true;
    }

    /// Remove and return a value in one step.
    pub fn take(&self, key: &str) -> Option<Value> {
        let mut state = self.state.lock();
        let value = state.record.data.remove(key);
        if value.is_some() {
            state.dirty = true;
        }
        value
    }

    /// The signed-in account id, if any.
    pub fn user_id(&self) -> Option<i64> {
        self.get(AUTH_USER_ID_KEY).and_then(|v| v.as_i64())
    }

    /// Queue a confirmation message for the next rendered page.
    pub fn set_flash(&self, message: &str) {
        self.put(FLASH_KEY, Value::String(message.to_string()));
    }

    /// Consume the queued confirmation message. Reading it clears it.
    pub fn take_flash(&self) -> Option<String> {
        self.take(FLASH_KEY)
            .and_then(|v| v.as_str().map(|s| s.to_string()))
    }

    /// Swap in a new session token and CSRF token, keeping the data map.
    /// The previously persisted record is queued for deletion, which is what
    /// makes the old cookie worthless after a privilege change.
    pub fn renew_token(&self) -> Result<(), SessionError> {
        let token = gen_random_string(32)?;
        let csrf_token = gen_random_string(32)?;

        let mut state = self.state.lock();
        if !state.fresh && state.stale_token.is_none() {
            state.stale_token = Some(state.token.clone());
        }
        state.token = token;
        state.record.csrf_token = csrf_token;
        state.record.expires_at = Utc::now() + Duration::seconds(state.record.ttl as i64);
        state.dirty = true;
        Ok(())
    }

    /// Anonymous -> Authenticated transition.
    pub fn log_in(&self, user_id: i64) -> Result<(), SessionError> {
        self.renew_token()?;
        self.put(AUTH_USER_ID_KEY, Value::from(user_id));
        Ok(())
    }

    /// Authenticated -> Anonymous transition.
    pub fn log_out(&self) -> Result<(), SessionError> {
        self.renew_token()?;
        self.remove(AUTH_USER_ID_KEY);
        Ok(())
    }

    pub(super) fn commit_state(&self) -> CommitState {
        let state = self.state.lock();
        CommitState {
            token: state.token.clone(),
            record: state.record.clone(),
            dirty: state.dirty,
            stale_token: state.stale_token.clone(),
        }
    }
}
