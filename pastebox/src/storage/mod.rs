mod cache_store;
mod data_store;
mod errors;
mod types;

pub use cache_store::{CacheStore, connect_cache_store};
pub use data_store::{DataStore, connect_data_store};
pub use errors::StorageError;
pub use types::CacheData;
