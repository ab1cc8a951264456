use async_trait::async_trait;
use std::future::Future;

use crate::error::BoxError;

/// A capability that produces a resource on demand.
///
/// Loaders are supplied by callers and never inspected by the cache. A loader
/// may be invoked more than once when attempts fail, so it must be callable
/// repeatedly.
///
/// The trait is implemented for any `Fn() -> Future` closure, so call sites
/// usually just pass a closure:
///
/// ```ignore
/// let bundle = cache
///     .load("tool:json-formatter", || async {
///         Ok(fetch_bundle("json-formatter").await?)
///     })
///     .await?;
/// ```
#[async_trait]
pub trait Loader<T>: Send + Sync {
    /// Produce the resource or fail.
    async fn load(&self) -> Result<T, BoxError>;
}

#[async_trait]
impl<T, F, Fut> Loader<T> for F
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, BoxError>> + Send,
{
    async fn load(&self) -> Result<T, BoxError> {
        (self)().await
    }
}
