use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    expires_at: DateTime<Utc>,
}

/// Signed CV links keyed by storage path.
///
/// Entries are kept for `cache_ttl`, which is shorter than the lifetime the
/// storage backend grants the link so a cached URL is never handed out expired.
#[derive(Debug)]
pub struct SignedUrlCache {
    cache_ttl: Duration,
    entries: Mutex<HashMap<String, CachedUrl>>,
}

impl SignedUrlCache {
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            cache_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, path: &str, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.lock();
        match entries.get(path) {
            Some(hit) if hit.expires_at > now => Some(hit.url.clone()),
            Some(_) => {
                entries.remove(path);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, path: &str, url: String, now: DateTime<Utc>) {
        self.lock().insert(
            path.to_string(),
            CachedUrl {
                url,
                expires_at: now + self.cache_ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedUrl>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn returns_cached_url_before_expiry() {
        let cache = SignedUrlCache::new(Duration::seconds(55));
        cache.insert("cvs/a.pdf", "https://signed/a".to_string(), now());
        assert_eq!(
            cache.get("cvs/a.pdf", now() + Duration::seconds(54)),
            Some("https://signed/a".to_string())
        );
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = SignedUrlCache::new(Duration::seconds(55));
        cache.insert("cvs/a.pdf", "https://signed/a".to_string(), now());
        assert_eq!(cache.get("cvs/a.pdf", now() + Duration::seconds(55)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let cache = SignedUrlCache::new(Duration::seconds(55));
        cache.insert("a", "1".to_string(), now());
        cache.insert("b", "2".to_string(), now());
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert_eq!(cache.get("a", now()), None);
    }
}
