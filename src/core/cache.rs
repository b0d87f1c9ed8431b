//! Persistent key-value store abstraction and typed helpers on top of it

use super::error::RateError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

pub const SYMBOLS_KEY: &str = "List";
pub const RATES_KEY: &str = "Rates";
pub const FAVORITES_KEY: &str = "Favorites";
pub const HISTORY_KEY: &str = "History";

/// String-keyed, string-valued durable storage. A missing key is `Ok(None)`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Returns once the value is durable.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub async fn write_json<T: Serialize + Sync + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize value for key: {key}"))?;
    store.set(key, &json).await
}

/// Reads and decodes `key`. Absent keys, store failures and undecodable
/// values all come back as `CacheMiss`; the latter two are logged.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<T, RateError> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("Cache MISS for key: {}", key);
            return Err(RateError::CacheMiss(key.to_string()));
        }
        Err(e) => {
            warn!(error = %e, "Failed to read key: {}", key);
            return Err(RateError::CacheMiss(key.to_string()));
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!("Cache HIT for key: {}", key);
            Ok(value)
        }
        Err(e) => {
            warn!(error = %e, "Discarding unreadable cached value for key: {}", key);
            Err(RateError::CacheMiss(key.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_json_round_trip_through_store() {
        let store = MemoryStore::new();
        write_json(&store, "k", &vec![1, 2, 3]).await.unwrap();
        let value: Vec<i32> = read_json(&store, "k").await.unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_values_are_cache_misses() {
        let store = MemoryStore::new();
        let missing: Result<Vec<i32>, _> = read_json(&store, "absent").await;
        assert_eq!(missing, Err(RateError::CacheMiss("absent".to_string())));

        store.set("bad", "{not json").await.unwrap();
        let corrupt: Result<Vec<i32>, _> = read_json(&store, "bad").await;
        assert_eq!(corrupt, Err(RateError::CacheMiss("bad".to_string())));
    }
}
