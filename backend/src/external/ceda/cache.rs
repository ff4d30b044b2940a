//! Time-stamped in-memory cache
//!
//! Entries are never evicted; an expired entry stays readable through
//! `get_stale` so callers can fall back to it when a refresh fails.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Value for `key` if it has not expired
    pub async fn get_fresh(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Value for `key` regardless of age
    pub async fn get_stale(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: K, value: V) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(key, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_and_stale() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get_fresh(&"k").await, None::<u32>);

        cache.insert("k", 7u32).await;
        assert_eq!(cache.get_fresh(&"k").await, Some(7));
        assert_eq!(cache.get_stale(&"k").await, Some(7));
    }

    #[tokio::test]
    async fn test_expired_entry_is_only_stale() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", "v".to_string()).await;
        assert_eq!(cache.get_fresh(&"k").await, None);
        assert_eq!(cache.get_stale(&"k").await.as_deref(), Some("v"));
    }
}
