//! onceload - single-flight, on-demand resource loading for Rust
//!
//! This library provides a loader cache for heavyweight artifacts (UI bundles,
//! WASM runtimes, large blobs) with:
//! - Single-flight deduplication: at most one load per key, concurrent callers
//!   share the in-flight result
//! - Bounded retries with linear backoff and a per-attempt timeout
//! - Fire-and-forget preloading, individually or in batches
//! - Age-based eviction for long-lived processes
//!
//! # Example
//!
//! ```ignore
//! use onceload::{LoadConfig, LoaderCache};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache: LoaderCache<Vec<u8>> = LoaderCache::new();
//!
//!     // First caller runs the loader; concurrent callers for the same key
//!     // join the in-flight load instead of starting their own.
//!     let bundle = cache
//!         .load("tool:json-formatter", || async {
//!             Ok(fetch_bundle("json-formatter").await?)
//!         })
//!         .await
//!         .unwrap();
//!
//!     // Speculative warm-up: never fails observably.
//!     cache
//!         .preload("wasm:ffmpeg", || async { Ok(fetch_runtime("ffmpeg").await?) })
//!         .await;
//!
//!     // Periodic cleanup is the caller's job.
//!     let evicted = cache.evict_older_than(30 * 60 * 1000).await;
//!     println!("evicted {evicted} stale entries");
//! }
//! ```

mod cache;
mod config;
mod entry;
mod error;
mod loader;
mod preload;
mod retry;
mod utils;

// Re-export public API
pub use cache::{CacheStats, LoaderCache};
pub use config::LoadConfig;
pub use entry::Entry;
pub use error::{BoxError, LoadError};
pub use loader::Loader;
pub use preload::PreloadRequest;
