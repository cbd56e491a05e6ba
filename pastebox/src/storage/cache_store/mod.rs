mod memory;
mod redis;
mod types;

use std::sync::Arc;

use super::errors::StorageError;

pub use types::CacheStore;

/// Open the cache store named by `url` and hand it back as a shareable
/// [`CacheStore`]. `"memory"` selects the in-process store; a `redis://` URL
/// selects Redis. The connection is verified before the store is returned.
pub async fn connect_cache_store(url: &str) -> Result<Arc<dyn CacheStore>, StorageError> {
    let store: Arc<dyn CacheStore> = match url {
        "memory" => Arc::new(types::InMemoryCacheStore::new()),
        url if url.starts_with("redis://") || url.starts_with("rediss://") => {
            tracing::info!("Connecting to redis cache store: {}", url);
            let client = ::redis::Client::open(url)?;
            Arc::new(types::RedisCacheStore { client })
        }
        other => {
            return Err(StorageError::Unsupported(format!(
                "Unsupported cache store: {other}. Supported stores are 'memory' and 'redis://'"
            )));
        }
    };

    store.init().await?;
    Ok(store)
}
