use crate::logic::Record;
use crate::model::{CanonicalId, IdKind, Subselection};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache key. Built from the canonical id only, so `115` and `"nm0000115"`
/// land on the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: IdKind,
    pub id: CanonicalId,
    pub subselection: Option<Subselection>,
}

impl CacheKey {
    pub fn new(kind: IdKind, id: &CanonicalId, subselection: Option<Subselection>) -> Self {
        Self {
            kind,
            id: id.clone(),
            subselection,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    record: Record,
    stored_at: Instant,
}

/// In-memory memoization of fetched records with a TTL
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Get a record if present and not expired
    pub async fn get(&self, key: &CacheKey) -> Option<Record> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                    return Some(entry.record.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired; a put may have refreshed it since the read lock was dropped
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => Some(entry.record.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a record, sweeping out anything that has already expired
    pub async fn put(&self, key: CacheKey, record: Record) {
        let ttl = self.ttl;
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() <= ttl);
        entries.insert(
            key,
            CacheEntry {
                record,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn remove(&self, key: &CacheKey) {
        self.entries.write().await.remove(key);
    }

    /// Drop every expired entry
    pub async fn clear_expired(&self) {
        let ttl = self.ttl;
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() <= ttl);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for ResponseCache {
    /// One hour TTL
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize;
    use serde_json::json;

    fn record(title: &str) -> Record {
        match json!({"id": "tt0477051", "primary_title": title}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = ResponseCache::default();
        let id = normalize("tt0477051", IdKind::Title).unwrap();
        let key = CacheKey::new(IdKind::Title, &id, None);

        assert!(cache.get(&key).await.is_none());

        cache.put(key.clone(), record("Norbit")).await;
        let cached = cache.get(&key).await;
        assert_eq!(cached.unwrap()["primary_title"], "Norbit");

        cache.remove(&key).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_equivalent_ids_share_entry() {
        let cache = ResponseCache::default();
        let from_int = normalize(477051, IdKind::Title).unwrap();
        let from_str = normalize("tt0477051", IdKind::Title).unwrap();

        cache
            .put(CacheKey::new(IdKind::Title, &from_int, None), record("Norbit"))
            .await;
        assert!(cache
            .get(&CacheKey::new(IdKind::Title, &from_str, None))
            .await
            .is_some());

        // Sub-selections are separate entries
        assert!(cache
            .get(&CacheKey::new(
                IdKind::Title,
                &from_str,
                Some(Subselection::Akas)
            ))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_dropped() {
        let cache = ResponseCache::new(Duration::ZERO);
        let id = normalize(115, IdKind::Name).unwrap();
        let key = CacheKey::new(IdKind::Name, &id, None);

        cache.put(key.clone(), record("x")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.clear_expired().await;
        assert_eq!(cache.len().await, 0);

        cache.put(key.clone(), record("x")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.get(&key).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_sweeps_expired_entries() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        let stale = normalize(1, IdKind::Title).unwrap();
        let fresh = normalize(2, IdKind::Title).unwrap();

        cache
            .put(CacheKey::new(IdKind::Title, &stale, None), record("old"))
            .await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        // The stale id is never looked up again, the next put drops it anyway
        cache
            .put(CacheKey::new(IdKind::Title, &fresh, None), record("new"))
            .await;
        assert_eq!(cache.len().await, 1);
        assert!(cache
            .get(&CacheKey::new(IdKind::Title, &fresh, None))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_refreshed_entry_survives_expiry_check() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        let id = normalize(477051, IdKind::Title).unwrap();
        let key = CacheKey::new(IdKind::Title, &id, None);

        cache.put(key.clone(), record("old")).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        cache.put(key.clone(), record("new")).await;

        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached["primary_title"], "new");
    }
}
