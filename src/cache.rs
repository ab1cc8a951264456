use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock, oneshot};

use crate::config::LoadConfig;
use crate::entry::Entry;
use crate::error::LoadError;
use crate::loader::Loader;
use crate::retry;
use crate::utils::now_ms;

/// Outcome shared between every caller joined to one in-flight load.
type LoadOutcome<T> = Result<Arc<T>, LoadError>;

/// Pending result of the load currently running for a key.
type InFlight<T> = Shared<BoxFuture<'static, LoadOutcome<T>>>;

/// Read-only snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of resolved entries currently cached.
    pub resolved: usize,
    /// Number of keys with a load currently in flight.
    pub in_flight: usize,
    /// Number of cached keys that arrived via the preload path.
    pub preloaded: usize,
}

/// Single-flight cache for lazily loaded resources.
///
/// For any key, at most one load runs at a time: concurrent callers for the
/// same key share the in-flight result, and a completed load is cached until
/// evicted. Failed loads are never cached, so the next request for that key
/// starts a fresh attempt sequence.
///
/// The cache is an explicit value with an owned lifetime. Construct it once
/// at process start and hand clones to consumers; clones share state.
pub struct LoaderCache<T> {
    entries: Arc<RwLock<HashMap<String, Entry<T>>>>,
    in_flight: Arc<Mutex<HashMap<String, InFlight<T>>>>,
    pub(crate) preloaded: Arc<Mutex<HashSet<String>>>,
    defaults: LoadConfig,
}

impl<T> Clone for LoaderCache<T> {
    fn clone(&self) -> Self {
        LoaderCache {
            entries: Arc::clone(&self.entries),
            in_flight: Arc::clone(&self.in_flight),
            preloaded: Arc::clone(&self.preloaded),
            defaults: self.defaults.clone(),
        }
    }
}

impl<T> Default for LoaderCache<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoaderCache<T>
where
    T: Send + Sync + 'static,
{
    /// Create a cache using the default [`LoadConfig`] for every load.
    pub fn new() -> Self {
        Self::with_defaults(LoadConfig::default())
    }

    /// Create a cache whose `load` and `preload` calls use `defaults` unless
    /// overridden per call.
    pub fn with_defaults(defaults: LoadConfig) -> Self {
        LoaderCache {
            entries: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            preloaded: Arc::new(Mutex::new(HashSet::new())),
            defaults,
        }
    }

    /// Load the resource for `key`, deduplicating concurrent demand.
    ///
    /// - If the key is already resolved, the cached resource is returned
    ///   immediately and the loader is not invoked.
    /// - If a load for the key is in flight, this call joins it and observes
    ///   the same outcome as every other waiting caller.
    /// - Otherwise a new attempt sequence starts with the cache's default
    ///   config; see [`LoaderCache::load_with`] to override it.
    pub async fn load<L>(&self, key: &str, loader: L) -> Result<Arc<T>, LoadError>
    where
        L: Loader<T> + 'static,
    {
        self.load_with(key, loader, self.defaults.clone()).await
    }

    /// Like [`LoaderCache::load`] with an explicit per-call config.
    pub async fn load_with<L>(
        &self,
        key: &str,
        loader: L,
        config: LoadConfig,
    ) -> Result<Arc<T>, LoadError>
    where
        L: Loader<T> + 'static,
    {
        self.load_shared(key, Arc::new(loader), config).await
    }

    pub(crate) async fn load_shared(
        &self,
        key: &str,
        loader: Arc<dyn Loader<T>>,
        config: LoadConfig,
    ) -> Result<Arc<T>, LoadError> {
        // Fast path: resolved entry, no loader invocation.
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                return Ok(Arc::clone(&entry.resource));
            }
        }

        let pending = {
            let mut in_flight = self.in_flight.lock().await;

            if let Some(pending) = in_flight.get(key) {
                pending.clone()
            } else {
                // A load may have resolved between the fast-path check and
                // taking this lock; re-check before starting a new generation.
                if let Some(entry) = self.entries.read().await.get(key) {
                    return Ok(Arc::clone(&entry.resource));
                }

                let pending = self.spawn_load(key, loader, config);
                in_flight.insert(key.to_string(), pending.clone());
                pending
            }
        };

        pending.await
    }

    /// Spawn the driver task for a new load generation.
    ///
    /// The task runs to completion even if every caller stops awaiting, so
    /// fire-and-forget preloads still settle and clear their in-flight marker.
    fn spawn_load(&self, key: &str, loader: Arc<dyn Loader<T>>, config: LoadConfig) -> InFlight<T> {
        let entries = Arc::clone(&self.entries);
        let in_flight = Arc::clone(&self.in_flight);
        let key = key.to_string();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let started = Instant::now();

            let outcome = match retry::load_with_retry(&key, loader.as_ref(), &config).await {
                Ok(resource) => {
                    let resource = Arc::new(resource);
                    let entry = Entry::new(
                        Arc::clone(&resource),
                        now_ms(),
                        started.elapsed().as_millis() as u64,
                    );
                    // Insert the entry before clearing the in-flight marker so
                    // no caller can observe the key as neither resolved nor
                    // loading.
                    entries.write().await.insert(key.clone(), entry);
                    Ok(resource)
                }
                // Failed generations are discarded; the next load for this key
                // starts from scratch.
                Err(error) => Err(error),
            };

            in_flight.lock().await.remove(&key);
            let _ = tx.send(outcome);
        });

        rx.map(|received| match received {
            Ok(outcome) => outcome,
            Err(_) => Err(LoadError::loader("load task dropped before completing".into())),
        })
        .boxed()
        .shared()
    }

    /// Whether `key` has a resolved entry.
    pub async fn is_loaded(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Return the resolved resource for `key` without triggering a load.
    pub async fn get_loaded(&self, key: &str) -> Option<Arc<T>> {
        self.entries
            .read()
            .await
            .get(key)
            .map(|entry| Arc::clone(&entry.resource))
    }

    /// Whether a load for `key` is currently in flight.
    pub(crate) async fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.lock().await.contains_key(key)
    }

    pub(crate) fn defaults(&self) -> &LoadConfig {
        &self.defaults
    }

    /// Evict every resolved entry older than `max_age_ms`, returning the
    /// count removed.
    ///
    /// In-flight loads are never touched; they are bounded by their own
    /// retry and timeout budget, not by age. The cache schedules no timer of
    /// its own, so callers wanting periodic cleanup must call this themselves.
    pub async fn evict_older_than(&self, max_age_ms: i64) -> usize {
        let now = now_ms();

        let evicted: Vec<String> = {
            let mut entries = self.entries.write().await;
            let stale: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| entry.is_older_than(max_age_ms, now))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &stale {
                entries.remove(key);
            }
            stale
        };

        if !evicted.is_empty() {
            let mut preloaded = self.preloaded.lock().await;
            for key in &evicted {
                preloaded.remove(key);
            }
            tracing::debug!(
                "evicted {} entries older than {}ms",
                evicted.len(),
                max_age_ms
            );
        }

        evicted.len()
    }

    /// Snapshot current occupancy. Read-only, no side effects.
    pub async fn stats(&self) -> CacheStats {
        let resolved = self.entries.read().await.len();
        let in_flight = self.in_flight.lock().await.len();
        let preloaded = self.preloaded.lock().await.len();
        CacheStats {
            resolved,
            in_flight,
            preloaded,
        }
    }
}
