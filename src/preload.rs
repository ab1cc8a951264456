//! Speculative cache warming.
//!
//! Preloads are fire-and-forget: failures are logged and swallowed, and a key
//! that is already resolved or in flight is left alone. A preloaded entry is
//! indistinguishable from an explicitly loaded one once cached; the preload
//! set only feeds [`CacheStats`](crate::CacheStats).
//!
//! Deciding *when* to preload (page idle, network quality, a fixed policy
//! list) is the caller's concern; the cache only exposes the mechanism.

use futures::future::join_all;
use std::sync::Arc;

use crate::cache::LoaderCache;
use crate::config::LoadConfig;
use crate::loader::Loader;

/// One entry in a batch preload: a key, its loader, and an optional config
/// override.
pub struct PreloadRequest<T> {
    key: String,
    loader: Arc<dyn Loader<T>>,
    config: Option<LoadConfig>,
}

impl<T> PreloadRequest<T>
where
    T: Send + Sync + 'static,
{
    /// Create a request that uses the cache-level default config.
    pub fn new<L>(key: impl Into<String>, loader: L) -> Self
    where
        L: Loader<T> + 'static,
    {
        PreloadRequest {
            key: key.into(),
            loader: Arc::new(loader),
            config: None,
        }
    }

    /// Override the cache-level default config for this key.
    pub fn with_config(mut self, config: LoadConfig) -> Self {
        self.config = Some(config);
        self
    }
}

impl<T> LoaderCache<T>
where
    T: Send + Sync + 'static,
{
    /// Warm the cache for `key` without making the caller wait on failure.
    ///
    /// No-op when the key is already resolved or in flight. Load failures are
    /// logged and swallowed; a consumer that needs the resource must call
    /// [`LoaderCache::load`] itself, which starts from scratch rather than
    /// resuming a failed preload.
    pub async fn preload<L>(&self, key: &str, loader: L)
    where
        L: Loader<T> + 'static,
    {
        self.preload_shared(key, Arc::new(loader), None).await;
    }

    /// Like [`LoaderCache::preload`] with an explicit per-call config.
    pub async fn preload_with<L>(&self, key: &str, loader: L, config: LoadConfig)
    where
        L: Loader<T> + 'static,
    {
        self.preload_shared(key, Arc::new(loader), Some(config)).await;
    }

    /// Preload many keys concurrently and wait for all of them to settle.
    ///
    /// Individual failures never short-circuit the batch.
    pub async fn preload_batch(&self, requests: Vec<PreloadRequest<T>>) {
        let tasks = requests.into_iter().map(|request| {
            let cache = self.clone();
            async move {
                cache
                    .preload_shared(&request.key, request.loader, request.config)
                    .await;
            }
        });

        join_all(tasks).await;
    }

    async fn preload_shared(
        &self,
        key: &str,
        loader: Arc<dyn Loader<T>>,
        config: Option<LoadConfig>,
    ) {
        // Do not duplicate work already done or in progress.
        if self.is_loaded(key).await || self.is_in_flight(key).await {
            return;
        }

        self.preloaded.lock().await.insert(key.to_string());

        let config = config.unwrap_or_else(|| self.defaults().clone());
        if let Err(error) = self.load_shared(key, loader, config).await {
            self.preloaded.lock().await.remove(key);
            tracing::warn!("preload failed: key={}, error={}", key, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_config() -> LoadConfig {
        LoadConfig {
            retry_count: 0,
            retry_delay_ms: 0,
            timeout_ms: 1_000,
        }
    }

    #[tokio::test]
    async fn test_preload_warms_the_cache() {
        let cache: LoaderCache<String> = LoaderCache::new();

        cache
            .preload("bundle", || async {
                Ok::<String, BoxError>("payload".to_string())
            })
            .await;

        assert!(cache.is_loaded("bundle").await);
        assert_eq!(cache.stats().await.preloaded, 1);
    }

    #[tokio::test]
    async fn test_preload_failure_is_invisible() {
        let cache: LoaderCache<String> = LoaderCache::new();

        cache
            .preload_with(
                "bundle",
                || async { Err::<String, BoxError>("boom".into()) },
                fast_config(),
            )
            .await;

        assert!(!cache.is_loaded("bundle").await);
        assert_eq!(cache.stats().await.preloaded, 0);
    }

    #[tokio::test]
    async fn test_preload_skips_cached_key() {
        let cache: LoaderCache<String> = LoaderCache::new();

        cache
            .load("bundle", || async {
                Ok::<String, BoxError>("explicit".to_string())
            })
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        cache
            .preload("bundle", move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok::<String, BoxError>("speculative".to_string()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // The key was loaded explicitly, so it is not counted as preloaded.
        assert_eq!(cache.stats().await.preloaded, 0);
    }
}
