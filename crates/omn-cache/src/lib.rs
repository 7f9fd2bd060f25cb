//! Etag-validated cache buckets.
//!
//! - [`Cache`] hands out named [`CacheBucket`]s
//! - a bucket maps keys to bytes and only answers when the caller's etag
//!   matches the one stored with the value
//!
//! Implementations: [`NullCache`] (always misses), [`MemoryCache`] and
//! [`FileCache`].
//!
//! # Example
//!
//! ```
//! use omn_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::default();
//! let pages = cache.bucket("pages");
//! pages.set("frontend/git", "1700000000", b"<h1>Git</h1>");
//! assert!(pages.get("frontend/git", "1700000000").is_some());
//! assert!(pages.get("frontend/git", "1700000001").is_none());
//! ```

mod ext;
mod file;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub use ext::CacheBucketExt;
pub use file::FileCache;

/// Key-value store where each value carries an etag.
///
/// Writes are best effort. A failed write is logged and then forgotten.
pub trait CacheBucket: Send + Sync {
    /// Value stored under `key` if it was stored with `etag`.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, etag: &str, value: &[u8]);
}

/// Factory for isolated buckets.
pub trait Cache: Send + Sync {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// Bucket that stores nothing.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}
}

/// Cache used when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

type Entries = Arc<RwLock<HashMap<String, (String, Vec<u8>)>>>;

/// Process-local cache. Buckets with the same name share entries.
#[derive(Default)]
pub struct MemoryCache {
    buckets: RwLock<HashMap<String, Entries>>,
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        let mut buckets = self
            .buckets
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entries = buckets.entry(name.to_owned()).or_default();
        Box::new(MemoryCacheBucket {
            entries: Arc::clone(entries),
        })
    }
}

struct MemoryCacheBucket {
    entries: Entries,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().ok()?;
        let (stored_etag, value) = entries.get(key)?;
        (stored_etag == etag).then(|| value.clone())
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_owned(), (etag.to_owned(), value.to_vec()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_always_misses() {
        let bucket = NullCache.bucket("pages");
        bucket.set("frontend/git", "1", b"<p>git</p>");
        assert_eq!(bucket.get("frontend/git", "1"), None);
    }

    #[test]
    fn test_memory_cache_hit_and_etag_miss() {
        let cache = MemoryCache::default();
        let bucket = cache.bucket("pages");

        bucket.set("frontend/git", "1", b"<p>git</p>");

        assert_eq!(bucket.get("frontend/git", "1"), Some(b"<p>git</p>".to_vec()));
        assert_eq!(bucket.get("frontend/git", "2"), None);
        assert_eq!(bucket.get("frontend/css", "1"), None);
    }

    #[test]
    fn test_memory_cache_same_name_shares_entries() {
        let cache = MemoryCache::default();
        cache.bucket("pages").set("k", "e", b"v");

        assert_eq!(cache.bucket("pages").get("k", "e"), Some(b"v".to_vec()));
        assert_eq!(cache.bucket("other").get("k", "e"), None);
    }

    #[test]
    fn test_caches_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NullCache>();
        assert_send_sync::<MemoryCache>();
        assert_send_sync::<FileCache>();
    }
}
