use std::sync::LazyLock;

use super::errors::UserError;

/// bcrypt work factor for stored credentials. `DEFAULT_COST` is 12.
pub(super) const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

// Verified against when an email lookup misses, so that path costs one
// bcrypt comparison just like a wrong password does.
static FALLBACK_HASH: LazyLock<String> = LazyLock::new(|| {
    bcrypt::hash("pastebox-fallback-password", BCRYPT_COST)
        .expect("Failed to hash the fallback password")
});

/// Force the fallback hash to be computed now rather than on the first
/// failed login.
pub(super) fn warm_fallback_hash() {
    LazyLock::force(&FALLBACK_HASH);
}

/// Hash a password on the blocking pool. bcrypt at cost 12 takes long enough
/// that it must not run on an async worker thread.
pub(super) async fn hash(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| UserError::Hash(e.to_string()))?
        .map_err(|e| UserError::Hash(e.to_string()))
}

/// Check a password against a stored hash on the blocking pool.
pub(super) async fn verify(password: String, hashed: String) -> Result<bool, UserError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed))
        .await
        .map_err(|e| UserError::Hash(e.to_string()))?
        .map_err(|e| UserError::Hash(e.to_string()))
}

/// Burn one bcrypt comparison against the fallback hash. The result is
/// discarded; only the elapsed time matters.
pub(super) async fn verify_fallback(password: String) {
    let _ = verify(password, FALLBACK_HASH.clone()).await;
}
