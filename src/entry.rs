use std::sync::Arc;

/// A resolved cache entry: the loaded resource plus load metadata.
///
/// The cache owns the entry; callers receive `Arc` clones of the resource and
/// never mutate through the cache.
#[derive(Debug)]
pub struct Entry<T> {
    /// The loaded resource.
    pub resource: Arc<T>,

    /// Unix timestamp in milliseconds when the load completed.
    /// Used for age-based eviction.
    pub loaded_at: i64,

    /// How long the successful load took. Diagnostic only.
    pub load_duration_ms: u64,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Entry {
            resource: Arc::clone(&self.resource),
            loaded_at: self.loaded_at,
            load_duration_ms: self.load_duration_ms,
        }
    }
}

impl<T> Entry<T> {
    /// Create a new entry.
    pub fn new(resource: Arc<T>, loaded_at: i64, load_duration_ms: u64) -> Self {
        Entry {
            resource,
            loaded_at,
            load_duration_ms,
        }
    }

    /// Age of this entry relative to `now_ms` (unix milliseconds).
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.loaded_at
    }

    /// Check if the entry is older than `max_age_ms` and eligible for eviction.
    pub fn is_older_than(&self, max_age_ms: i64, now_ms: i64) -> bool {
        self.age_ms(now_ms) > max_age_ms
    }
}
